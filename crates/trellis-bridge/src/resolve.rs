//! Address resolution
//!
//! An inbound address pattern carries a role path and a trailing method
//! token: `/Mixer/Gain/1/4.2` addresses method `(4,2)` on the object at
//! role path `Mixer/Gain/1`. Resolution parses the token first, then asks
//! the device tree for the first object matching the role path.

use trellis_core::{Error, MethodId, Result};
use trellis_device::{Device, ResolvedObject};

/// Split an address pattern into its role path and method identifier.
///
/// Fails with `BadMethod` when the pattern has fewer than two segments or
/// the trailing token is not `"<uint>.<uint>"`.
pub fn split_address(pattern: &str) -> Result<(Vec<String>, MethodId)> {
    let mut segments: Vec<String> = pattern
        .split('/')
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();

    if segments.len() < 2 {
        return Err(Error::BadMethod(format!(
            "address pattern too short: {pattern:?}"
        )));
    }

    let token = segments
        .pop()
        .ok_or_else(|| Error::BadMethod(format!("empty address pattern: {pattern:?}")))?;
    let method = token.parse::<MethodId>()?;

    Ok((segments, method))
}

/// Resolve an address pattern to a target object and method.
///
/// With duplicate role paths the first object in tree order wins,
/// silently; ambiguity is not an error.
pub async fn resolve(device: &dyn Device, pattern: &str) -> Result<(ResolvedObject, MethodId)> {
    let (role_path, method) = split_address(pattern)?;

    let target = device
        .find_by_role_path(&role_path)
        .await
        .ok_or_else(|| {
            Error::ProcessingFailed(format!("no object at role path {}", role_path.join("/")))
        })?;

    Ok((target, method))
}
