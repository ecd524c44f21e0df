//! Engine/runtime identity consulted by catalog qualifiers

use serde::{Deserialize, Serialize};

/// Identity of the environment reporting devices
///
/// Catalog entries may be restricted to an engine (`gecko`, `webkit`) or a
/// runtime (`firefox`, `chrome`, `gilrs`, ...).
pub trait RuntimeIdentity {
    fn engine(&self) -> &str;
    fn runtime(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformIdentity {
    pub engine: String,
    pub runtime: String,
}

impl PlatformIdentity {
    pub fn new(engine: impl Into<String>, runtime: impl Into<String>) -> Self {
        Self {
            engine: engine.into(),
            runtime: runtime.into(),
        }
    }

    /// Browser style identity: Firefox runs on gecko, everything else is
    /// treated as webkit
    pub fn for_runtime(runtime: impl Into<String>) -> Self {
        let runtime = runtime.into();
        let engine = if runtime == "firefox" { "gecko" } else { "webkit" };
        Self::new(engine, runtime)
    }

    /// Identity of the native gilrs host
    pub fn native() -> Self {
        Self::new("native", "gilrs")
    }
}

impl Default for PlatformIdentity {
    fn default() -> Self {
        Self::native()
    }
}

impl RuntimeIdentity for PlatformIdentity {
    fn engine(&self) -> &str {
        &self.engine
    }

    fn runtime(&self) -> &str {
        &self.runtime
    }
}

/// Optional overrides read from the `[platform]` config section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformOverride {
    pub engine: Option<String>,
    pub runtime: Option<String>,
}

impl PlatformOverride {
    /// Applies the overrides on top of a detected identity
    ///
    /// A runtime override without an engine override derives the engine
    /// from the runtime.
    pub fn apply(&self, detected: PlatformIdentity) -> PlatformIdentity {
        let base = match &self.runtime {
            Some(runtime) => PlatformIdentity::for_runtime(runtime.clone()),
            None => detected,
        };
        match &self.engine {
            Some(engine) => PlatformIdentity::new(engine.clone(), base.runtime),
            None => base,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn firefox_is_gecko_everything_else_webkit() {
        assert_eq!(PlatformIdentity::for_runtime("firefox").engine(), "gecko");
        assert_eq!(PlatformIdentity::for_runtime("chrome").engine(), "webkit");
        assert_eq!(PlatformIdentity::for_runtime("opera").engine(), "webkit");
    }

    #[test]
    fn overrides_apply_on_top_of_detection() {
        let detected = PlatformIdentity::native();
        assert_eq!(PlatformOverride::default().apply(detected.clone()), detected);

        let runtime_only = PlatformOverride {
            engine: None,
            runtime: Some("firefox".to_string()),
        };
        assert_eq!(
            runtime_only.apply(detected.clone()),
            PlatformIdentity::new("gecko", "firefox")
        );

        let engine_only = PlatformOverride {
            engine: Some("webkit".to_string()),
            runtime: None,
        };
        assert_eq!(
            engine_only.apply(detected),
            PlatformIdentity::new("webkit", "gilrs")
        );
    }
}
