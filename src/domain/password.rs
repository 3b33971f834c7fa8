use secrecy::{ExposeSecret, Secret};

/// A plaintext password that passed the registration policy
#[derive(Debug)]
pub struct Password(Secret<String>);

impl Password {
    pub fn parse(s: Secret<String>) -> Result<Self, String> {
        if s.expose_secret().is_empty() {
            Err("Password cannot be empty".to_string())
        } else {
            Ok(Self(s))
        }
    }
}

impl ExposeSecret<String> for Password {
    fn expose_secret(&self) -> &String {
        self.0.expose_secret()
    }
}
