//! Default values for font resolution settings.
//!
//! The platform family lists are ordered by preference; the first family the
//! platform directory can resolve becomes the logical font's primary face.

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| (*s).to_string()).collect()
}

pub fn default_family() -> String {
    "System".to_string()
}

pub fn retained_strikes() -> usize {
    8
}

pub fn sweep_interval() -> u32 {
    256
}

pub fn load_system_fonts() -> bool {
    true
}

pub fn system_families() -> Vec<String> {
    if cfg!(target_os = "macos") {
        owned(&["System Font", "Helvetica Neue", "Helvetica", "system-ui"])
    } else if cfg!(target_os = "windows") {
        owned(&["Segoe UI", "Tahoma", "Arial", "system-ui"])
    } else {
        owned(&["Cantarell", "Noto Sans", "DejaVu Sans", "Liberation Sans", "system-ui"])
    }
}

pub fn serif_families() -> Vec<String> {
    if cfg!(target_os = "macos") {
        owned(&["Times", "Times New Roman", "serif"])
    } else if cfg!(target_os = "windows") {
        owned(&["Times New Roman", "Cambria", "serif"])
    } else {
        owned(&["Noto Serif", "DejaVu Serif", "Liberation Serif", "serif"])
    }
}

pub fn sans_serif_families() -> Vec<String> {
    if cfg!(target_os = "macos") {
        owned(&["Helvetica", "Arial", "sans-serif"])
    } else if cfg!(target_os = "windows") {
        owned(&["Arial", "Segoe UI", "sans-serif"])
    } else {
        owned(&["Noto Sans", "DejaVu Sans", "Liberation Sans", "sans-serif"])
    }
}

pub fn monospaced_families() -> Vec<String> {
    if cfg!(target_os = "macos") {
        owned(&["Menlo", "Monaco", "Courier New", "monospace"])
    } else if cfg!(target_os = "windows") {
        owned(&["Consolas", "Courier New", "monospace"])
    } else {
        owned(&["DejaVu Sans Mono", "Noto Sans Mono", "Liberation Mono", "monospace"])
    }
}

/// Fallback font families in priority order.
///
/// Every composite font appends the families from this list that the platform
/// can resolve, after its primary face. The order is designed to provide:
/// 1. General Latin/Greek/Cyrillic coverage
/// 2. CJK support (Japanese, Simplified/Traditional Chinese, Korean)
/// 3. Complex scripts (Arabic, Hebrew, Indic, Thai)
/// 4. Monochrome symbol fonts
/// 5. Color emoji fonts (flags, pictographs)
pub fn fallback_families() -> Vec<String> {
    owned(&[
        // General coverage
        "DejaVu Sans",
        "Noto Sans",
        "Arial Unicode MS",
        // CJK fonts
        "Noto Sans CJK JP",
        "Noto Sans CJK SC",
        "Noto Sans CJK TC",
        "Noto Sans CJK KR",
        "Hiragino Sans",
        "PingFang SC",
        "Apple SD Gothic Neo",
        "Microsoft YaHei",
        "Yu Gothic",
        "Malgun Gothic",
        // Complex scripts
        "Noto Sans Arabic",
        "Noto Sans Hebrew",
        "Noto Sans Devanagari",
        "Noto Sans Thai",
        "Geeza Pro",
        "Nirmala UI",
        // Monochrome symbols (before emoji to prefer outlines for dingbats)
        "Noto Sans Symbols",
        "Noto Sans Symbols 2",
        "Apple Symbols",
        "Segoe UI Symbol",
        "Symbola",
        // Color emoji
        "Noto Color Emoji",
        "Apple Color Emoji",
        "Segoe UI Emoji",
    ])
}
