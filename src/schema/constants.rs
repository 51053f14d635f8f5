/// gridstore fragment format version - follows semantic versioning
pub const GRIDSTORE_FORMAT_VERSION: &str = "1.0.0";

/// Name of the coordinate pseudo-field.
///
/// The coordinates of every dimension are carried interleaved in a single
/// buffer under this name, one `u64` per dimension per cell.
pub const COORDS_FIELD: &str = "__coords";

/// File name of the tile data stream inside a fragment directory
pub const FRAGMENT_DATA_FILE: &str = "fragment.bin";

/// File name of the fragment metadata document
pub const FRAGMENT_METADATA_FILE: &str = "fragment.json";

/// File name of the commit marker, written last during finalize
pub const COMMIT_MARKER_FILE: &str = ".committed";

/// Prefix of every fragment directory name
pub const FRAGMENT_NAME_PREFIX: &str = "__";
