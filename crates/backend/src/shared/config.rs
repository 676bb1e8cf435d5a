use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub certificate: CertificateConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Plain-text file with one outstanding code per line.
    pub codes_path: String,
    /// Append-only CSV file of issuance records.
    pub log_path: String,
}

/// Everything the certificate renderer needs: asset locations and the
/// fixed phrases of the document. Kept in configuration so tests can
/// point the renderer at a temp directory.
#[derive(Debug, Deserialize, Clone)]
pub struct CertificateConfig {
    pub header_image: String,
    /// Centered bold title drawn when the header image is absent.
    pub fallback_title: String,
    pub role: String,
    pub program: String,
    pub organization: String,
    pub academic_year: String,
    /// Plain paragraphs drawn after the acknowledgement sentence, one
    /// blank line after each.
    #[serde(default)]
    pub body_paragraphs: Vec<String>,
    pub issuer_heading: String,
    pub issuer_name: String,
    pub issuer_parent: String,
    #[serde(default)]
    pub signatories: Vec<Signatory>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Signatory {
    pub name: String,
    pub role: String,
    pub image: String,
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[server]
port = 3000

[storage]
codes_path = "codes.txt"
log_path = "certificate_log.txt"

[certificate]
header_image = "assets/header.png"
fallback_title = "Certificate of Acknowledgement"
role = "Mentor"
program = "MentorLink Programme"
organization = "STEP DTU"
academic_year = "2024-2025"
body_paragraphs = [
    "Their consistent efforts, guidance, and valuable contributions towards supporting and mentoring juniors are truly appreciated.",
    "Their role has been instrumental in fostering a culture of growth, empathy, and peer learning at DTU.",
]
issuer_heading = "Issued by:"
issuer_name = "STEP DTU Society"
issuer_parent = "Delhi Technological University"

[[certificate.signatories]]
name = "Divyansh Khandelwal"
role = "(President)"
image = "assets/divyansh_sign.jpg"

[[certificate.signatories]]
name = "Chaitanya Anand"
role = "(Vice President)"
image = "assets/chaitanya_sign.png"

[[certificate.signatories]]
name = "Sushant Nagi"
role = "(Project Head)"
image = "assets/sushant_sign.png"
"#;

/// Load configuration from config.toml
///
/// Search order:
/// 1. Current working directory
/// 2. Next to the executable (for production)
/// 3. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    let cwd_path = std::path::Path::new("config.toml");
    if cwd_path.exists() {
        tracing::info!("Loading config from: {}", cwd_path.display());
        let contents = std::fs::read_to_string(cwd_path)?;
        return Ok(toml::from_str(&contents)?);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");
            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                return Ok(toml::from_str(&contents)?);
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    let config: Config = toml::from_str(DEFAULT_CONFIG)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_loads() {
        let config: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.storage.codes_path, "codes.txt");
        assert_eq!(config.certificate.signatories.len(), 3);
    }

    #[test]
    fn signatories_are_optional() {
        let config: Config = toml::from_str(
            r#"
            [server]
            port = 8080
            [storage]
            codes_path = "c.txt"
            log_path = "l.txt"
            [certificate]
            header_image = "h.png"
            fallback_title = "Certificate"
            role = "Mentor"
            program = "P"
            organization = "O"
            academic_year = "2024-2025"
            issuer_heading = "Issued by:"
            issuer_name = "N"
            issuer_parent = "U"
            "#,
        )
        .unwrap();
        assert!(config.certificate.signatories.is_empty());
    }
}
