use crate::FirestoreError;
use secrecy::SecretString;

#[derive(Clone, Debug)]
pub struct Config {
    pub api_key: SecretString,
    pub project_id: String,
    pub base_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, FirestoreError> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Testable helper that reads configuration values using the provided
    /// function. This avoids mutating global environment in tests and keeps
    /// `from_env()` small and safe.
    pub fn from_env_with<F>(mut get: F) -> Result<Self, FirestoreError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let api = get("FIREBASE_API_KEY")
            .ok_or_else(|| FirestoreError::Config("FIREBASE_API_KEY missing".into()))?;
        let project_id = get("FIREBASE_PROJECT_ID")
            .ok_or_else(|| FirestoreError::Config("FIREBASE_PROJECT_ID missing".into()))?;
        let base_url = get("FIRESTORE_BASE_URL")
            .unwrap_or_else(|| "https://firestore.googleapis.com".into());
        Ok(Self {
            api_key: SecretString::new(api.into()),
            project_id,
            base_url,
        })
    }
}
