//! Eureka REST API request bodies

use serde::{Deserialize, Serialize};

use eureka_core::error::EurekaError;
use eureka_core::types::InstanceDescriptor;
use crate::RegistryResult;

/// Registration body: `{"instance": { ... }}`
///
/// Serialized from a borrowed descriptor when registering, deserialized into
/// an owned one when inspecting a captured request.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RegistrationEnvelope<T = InstanceDescriptor> {
    /// The instance being registered
    pub instance: T,
}

/// Encode the registration envelope for `instance` as JSON bytes
pub fn encode_registration(instance: &InstanceDescriptor) -> RegistryResult<Vec<u8>> {
    serde_json::to_vec(&RegistrationEnvelope { instance })
        .map_err(|e| EurekaError::serialization(
            format!("Failed to encode instance '{}': {}", instance.instance_id, e),
            e,
        ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_envelope_has_single_instance_key() {
        let instance = InstanceDescriptor::new("test-app", "localhost", "127.0.0.1", 8080)
            .with_instance_id("test-instance");

        let body = encode_registration(&instance).unwrap();
        let value: Value = serde_json::from_slice(&body).unwrap();

        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 1);
        assert_eq!(value["instance"]["instanceId"], "test-instance");
        assert_eq!(value["instance"]["app"], "test-app");
    }

    #[test]
    fn test_envelope_decodes_back() {
        let instance = InstanceDescriptor::new("test-app", "localhost", "127.0.0.1", 8080);

        let body = encode_registration(&instance).unwrap();
        let decoded: RegistrationEnvelope = serde_json::from_slice(&body).unwrap();

        assert_eq!(decoded.instance, instance);
    }

    #[test]
    fn test_default_descriptor_encodes() {
        // No validation happens here; an empty id is still sent as-is
        let body = encode_registration(&InstanceDescriptor::default()).unwrap();
        let value: Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(value["instance"]["instanceId"], "");
        assert_eq!(value["instance"]["status"], "UP");
    }
}
