use crate::DriverError;

const SYSTEM_DBS: [&str; 3] = ["_global_changes", "_replicator", "_users"];

/// Checks `name` against the CouchDB database naming rules.
///
/// A name starts with a lowercase letter and continues with lowercase
/// letters, digits or any of `_$()+-/`. The well-known system databases are
/// accepted as well.
pub fn validate_db_name(name: &str) -> Result<(), DriverError> {
    if SYSTEM_DBS.contains(&name) {
        return Ok(());
    }

    let mut chars = name.chars();

    let valid = chars.next().is_some_and(|c| c.is_ascii_lowercase())
        && chars.all(|c| {
            c.is_ascii_lowercase() || c.is_ascii_digit() || "_$()+-/".contains(c)
        });

    if valid {
        Ok(())
    } else {
        Err(DriverError::IllegalName(name.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_couchdb_names() {
        for name in ["kivik$0123456789abcdef", "a", "foo/bar", "x_(1)+y-z", "_users"] {
            assert!(validate_db_name(name).is_ok(), "{name} should be valid");
        }
    }

    #[test]
    fn rejects_illegal_names() {
        for name in ["", "Foo", "1abc", "_private", "has space", "caf\u{e9}"] {
            assert!(
                matches!(validate_db_name(name), Err(DriverError::IllegalName(_))),
                "{name:?} should be rejected"
            );
        }
    }
}
