// thumbsmith/src/utils/mod.rs
use crate::core::Result;
use std::path::Path;

/// Replace the final extension segment of a bare filename. No override
/// leaves the name untouched; a name without an extension gets one
/// appended.
pub fn replace_extension(file_name: &str, ext: Option<&str>) -> String {
    match ext {
        Some(ext) => Path::new(file_name)
            .with_extension(ext)
            .to_string_lossy()
            .into_owned(),
        None => file_name.to_string(),
    }
}

pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let base = 1024_f64;
    let bytes_f64 = bytes as f64;
    let exponent = (bytes_f64.log10() / base.log10()).floor() as i32;
    let size = bytes_f64 / base.powi(exponent);

    format!("{:.2} {}", size, UNITS[exponent as usize])
}

pub fn get_image_info(path: &Path) -> Result<(u32, u32, String)> {
    let reader = image::ImageReader::open(path)?.with_guessed_format()?;

    let format = reader
        .format()
        .map(|f| format!("{:?}", f).to_uppercase())
        .unwrap_or_else(|| "Unknown".to_string());

    let dimensions = reader.into_dimensions()?;

    Ok((dimensions.0, dimensions.1, format))
}
