/// Static capabilities of a filesystem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsMeta {
    pub case_insensitive: bool,
    /// Characters that may not appear anywhere in a path
    pub invalid_path_chars: &'static str,
    /// `None` when the limit is unknown
    pub max_path_length: Option<usize>,
    /// `None` when there is no system path
    pub max_sys_path_length: Option<usize>,
    pub network: bool,
    pub read_only: bool,
    pub supports_rename: bool,
}

impl FsMeta {
    /// Capabilities of pCloud storage
    pub const PCLOUD: Self = Self {
        case_insensitive: false,
        invalid_path_chars: ":",
        max_path_length: None,
        max_sys_path_length: None,
        network: true,
        read_only: false,
        supports_rename: false,
    };
}
