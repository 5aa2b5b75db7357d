//! Configuration types for Rust emission.

/// How family enums hold their constructor structs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Indirection {
    #[default]
    Box,
    Rc,
    Arc,
}

impl Indirection {
    pub(crate) fn path(self) -> &'static str {
        match self {
            Self::Box => "::std::boxed::Box",
            Self::Rc => "::std::rc::Rc",
            Self::Arc => "::std::sync::Arc",
        }
    }

    pub(crate) fn wrap(self, ty: &str) -> String {
        format!("{}<{ty}>", self.path())
    }

    /// `Rc` values cannot cross threads, so requests holding them cannot be submitted.
    pub(crate) fn is_send(self) -> bool {
        !matches!(self, Self::Rc)
    }
}

/// Configuration for Rust emission.
#[derive(Clone, Debug)]
pub struct Config {
    pub(crate) derive_debug: bool,
    pub(crate) derive_clone: bool,
    pub(crate) derive_partial_eq: bool,
    /// Wrapper around the structs held by family enums
    pub(crate) indirection: Indirection,
    /// Whether to emit the `Api` / `SyncApi` call traits
    pub(crate) emit_api: bool,
    /// Whether to emit the `Object` enum and its registry
    pub(crate) emit_registry: bool,
    /// Path of the wire runtime crate as seen from the generated code
    pub(crate) wire_crate: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            derive_debug: true,
            derive_clone: true,
            derive_partial_eq: true,
            indirection: Indirection::default(),
            emit_api: true,
            emit_registry: true,
            wire_crate: "::tlforge_wire".to_string(),
        }
    }
}

impl Config {
    /// Create a new Config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn derive_debug(mut self, value: bool) -> Self {
        self.derive_debug = value;
        self
    }

    pub fn derive_clone(mut self, value: bool) -> Self {
        self.derive_clone = value;
        self
    }

    pub fn derive_partial_eq(mut self, value: bool) -> Self {
        self.derive_partial_eq = value;
        self
    }

    /// Set the wrapper used by family enum variants.
    pub fn indirection(mut self, value: Indirection) -> Self {
        self.indirection = value;
        self
    }

    /// Set whether to emit the call traits.
    pub fn emit_api(mut self, value: bool) -> Self {
        self.emit_api = value;
        self
    }

    /// Set whether to emit the `Object` enum and `registry()`.
    pub fn emit_registry(mut self, value: bool) -> Self {
        self.emit_registry = value;
        self
    }

    /// Set the path the generated code uses to reach the wire runtime.
    pub fn wire_crate(mut self, path: impl Into<String>) -> Self {
        self.wire_crate = path.into();
        self
    }

    pub(crate) fn derives(&self) -> String {
        let mut derives = Vec::new();
        if self.derive_debug {
            derives.push("Debug");
        }
        if self.derive_clone {
            derives.push("Clone");
        }
        if self.derive_partial_eq {
            derives.push("PartialEq");
        }

        if derives.is_empty() {
            String::new()
        } else {
            format!("#[derive({})]\n", derives.join(", "))
        }
    }
}
