use std::sync::Arc;

use log::debug;

use crate::error_handling::types::ResolutionError;
use crate::host::{HostClass, HostProcess, MethodKey};

use super::types::InterceptionPoint;

/// Resolves an interception point against the host's loaded classes.
///
/// Resolution happens once, at registration time. The returned key
/// pins the exact slot the engine will detour, so later registrations
/// against an overloaded name with descriptors stay unambiguous.
pub fn resolve(
    host: &HostProcess,
    point: &InterceptionPoint,
) -> Result<(Arc<HostClass>, MethodKey), ResolutionError> {
    let class = host.class(&point.class_name)?;
    let key = class.resolve(&point.method_name, &point.param_types)?;
    debug!(
        "resolved {} ({} parameter descriptor(s))",
        point.site(),
        key.param_types.len()
    );
    Ok((class, key))
}
