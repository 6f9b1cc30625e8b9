use std::env;

/// `Ok(None)` when the variable is unset; a non-unicode value is an error.
pub fn read_var(name: &str) -> Result<Option<String>, env::VarError> {
    match env::var(name) {
        Ok(v) => Ok(Some(v)),
        Err(e) => {
            if let env::VarError::NotUnicode(_) = e {
                Err(e)
            } else {
                Ok(None)
            }
        }
    }
}
