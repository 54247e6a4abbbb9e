use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

const INVALID_FILE_NAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Replaces characters that are not allowed in file names on common
/// filesystems (and `:`) with `_`.
pub fn normalize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_control() || INVALID_FILE_NAME_CHARS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect()
}

/// `banks/Piano.sf2` is converted into `banks/Piano/`.
pub fn default_output_dir(input: &Path) -> PathBuf {
    input.with_extension("")
}

/// Rewrites `--filter:<substring>` into `--filter=<substring>`. Arguments
/// that are not valid UTF-8 are passed through untouched.
pub fn normalize_args(args: impl IntoIterator<Item = OsString>) -> Vec<OsString> {
    args.into_iter()
        .map(|arg| {
            let rewritten = arg
                .to_str()
                .and_then(|arg| arg.strip_prefix("--filter:"))
                .map(|filter| OsString::from(format!("--filter={filter}")));
            rewritten.unwrap_or(arg)
        })
        .collect()
}
