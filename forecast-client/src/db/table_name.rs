use std::fmt;

/// Postgres limits identifiers to NAMEDATALEN - 1 bytes.
const MAX_IDENTIFIER_BYTES: usize = 63;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TableNameError {
    #[error("table name is empty")]
    Empty,
    #[error("table name `{0}` has more than two dot-separated parts")]
    TooManyParts(String),
    #[error("table name part `{0}` is empty")]
    EmptyPart(String),
    #[error("table name part `{0}` exceeds 63 bytes")]
    TooLong(String),
    #[error("table name contains a NUL byte")]
    Nul,
}

/// A validated table name, optionally schema-qualified (`schema.table`).
///
/// Table names cannot be bound as query parameters, so the name is
/// interpolated into SQL. `quoted()` is the only form that should ever be
/// written into a statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableName {
    schema: Option<String>,
    table: String,
}

impl TableName {
    pub fn parse(raw: &str) -> Result<Self, TableNameError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(TableNameError::Empty);
        }
        if raw.contains('\0') {
            return Err(TableNameError::Nul);
        }

        let parts: Vec<&str> = raw.split('.').collect();
        for part in &parts {
            if part.is_empty() {
                return Err(TableNameError::EmptyPart(raw.to_string()));
            }
            if part.len() > MAX_IDENTIFIER_BYTES {
                return Err(TableNameError::TooLong(part.to_string()));
            }
        }

        match parts.as_slice() {
            [table] => Ok(Self {
                schema: None,
                table: table.to_string(),
            }),
            [schema, table] => Ok(Self {
                schema: Some(schema.to_string()),
                table: table.to_string(),
            }),
            _ => Err(TableNameError::TooManyParts(raw.to_string())),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    /// SQL form with every part double-quoted and embedded quotes doubled.
    pub fn quoted(&self) -> String {
        let mut out = String::with_capacity(self.table.len() + 4);
        if let Some(schema) = &self.schema {
            push_quoted(&mut out, schema);
            out.push('.');
        }
        push_quoted(&mut out, &self.table);
        out
    }
}

fn push_quoted(out: &mut String, ident: &str) {
    out.push('"');
    for ch in ident.chars() {
        if ch == '"' {
            out.push('"');
        }
        out.push(ch);
    }
    out.push('"');
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.schema {
            Some(schema) => write!(f, "{}.{}", schema, self.table),
            None => f.write_str(&self.table),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_name_is_quoted_verbatim() {
        let name = TableName::parse("Weather").unwrap();
        assert_eq!(name.quoted(), r#""Weather""#);
        assert_eq!(name.to_string(), "Weather");
        assert_eq!(name.schema(), None);
    }

    #[test]
    fn schema_qualified_name_quotes_each_part() {
        let name = TableName::parse("public.cmtr-weather").unwrap();
        assert_eq!(name.schema(), Some("public"));
        assert_eq!(name.table(), "cmtr-weather");
        assert_eq!(name.quoted(), r#""public"."cmtr-weather""#);
    }

    #[test]
    fn embedded_quotes_are_doubled() {
        let name = TableName::parse(r#"we"ather"#).unwrap();
        assert_eq!(name.quoted(), r#""we""ather""#);
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let name = TableName::parse("  Weather\n").unwrap();
        assert_eq!(name.table(), "Weather");
    }

    #[test]
    fn invalid_names_are_rejected() {
        assert_eq!(TableName::parse("   "), Err(TableNameError::Empty));
        assert!(matches!(
            TableName::parse("a.b.c"),
            Err(TableNameError::TooManyParts(_))
        ));
        assert!(matches!(
            TableName::parse("public."),
            Err(TableNameError::EmptyPart(_))
        ));
        assert!(matches!(
            TableName::parse(&"x".repeat(64)),
            Err(TableNameError::TooLong(_))
        ));
        assert_eq!(TableName::parse("wea\0ther"), Err(TableNameError::Nul));
    }
}
