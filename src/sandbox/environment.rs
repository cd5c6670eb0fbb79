use std::path::Path;

use serde::Deserialize;

use crate::core::{domain::TestEnvironment, errors::InfraError};

#[derive(Debug, Deserialize)]
struct TestEnvDescriptor {
    #[serde(rename = "type")]
    env_type: String,
    image: Option<String>,
    append_args: Option<String>,
}

pub fn parse_test_env(content: &str) -> Result<TestEnvironment, InfraError> {
    if content.trim().is_empty() {
        return Ok(TestEnvironment::Host);
    }

    let descriptor: TestEnvDescriptor =
        serde_yaml::from_str(content).map_err(|e| InfraError::Environment(e.to_string()))?;

    match descriptor.env_type.as_str() {
        "host" => Ok(TestEnvironment::Host),
        "namespace-isolated" | "firejail" => Ok(TestEnvironment::NamespaceIsolated {
            append_args: descriptor.append_args,
        }),
        "container" | "docker" => match descriptor.image {
            Some(image) if !image.trim().is_empty() => Ok(TestEnvironment::Container { image }),
            _ => Err(InfraError::Environment(
                "container environment requires an image".to_string(),
            )),
        },
        other => Err(InfraError::Environment(format!(
            "Unknown test env type {}",
            other
        ))),
    }
}

/// Resolves the descriptor at `path`; no descriptor means the host.
pub async fn load_test_env(path: &Path) -> Result<TestEnvironment, InfraError> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => parse_test_env(&content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(TestEnvironment::Host),
        Err(e) => Err(InfraError::Environment(format!(
            "failed to read {}: {}",
            path.display(),
            e
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_types() {
        assert_eq!(parse_test_env("type: host\n").unwrap(), TestEnvironment::Host);
        assert_eq!(
            parse_test_env("type: firejail\nappend_args: --net=none\n").unwrap(),
            TestEnvironment::NamespaceIsolated {
                append_args: Some("--net=none".to_string())
            }
        );
        assert_eq!(
            parse_test_env("type: namespace-isolated\n").unwrap(),
            TestEnvironment::NamespaceIsolated { append_args: None }
        );
        assert_eq!(
            parse_test_env("type: docker\nimage: gitkeeper/python:3.12\n").unwrap(),
            TestEnvironment::Container {
                image: "gitkeeper/python:3.12".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_type() {
        let result = parse_test_env("type: vm\n");

        assert!(matches!(result, Err(InfraError::Environment(msg)) if msg.contains("vm")));
    }

    #[test]
    fn test_container_without_image() {
        assert!(matches!(
            parse_test_env("type: container\n"),
            Err(InfraError::Environment(_))
        ));
    }

    #[test]
    fn test_missing_type() {
        assert!(parse_test_env("image: alpine\n").is_err());
    }

    #[tokio::test]
    async fn test_missing_descriptor_is_host() {
        let dir = tempfile::tempdir().unwrap();

        let env = load_test_env(&dir.path().join("test_env.yaml")).await.unwrap();

        assert_eq!(env, TestEnvironment::Host);
    }
}
