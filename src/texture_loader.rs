use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use exif::{In, Reader, Tag, Value};
use raylib::prelude::*;
use tracing::{debug, warn};

const EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "gif"];

fn extension(path: &Path) -> String {
    path.extension().and_then(|s| s.to_str()).unwrap_or("").to_lowercase()
}

/// Pictures of `dir`, sorted by file name. One slide each.
pub fn load_sorted_image_paths(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).with_context(|| format!("failed to read directory {}", dir.display()))?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.context("failed to read directory entry")?.path();
        if path.is_file() && EXTENSIONS.contains(&extension(&path).as_str()) {
            paths.push(path);
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    if paths.is_empty() {
        bail!("no pictures found in {}", dir.display());
    }
    Ok(paths)
}

/// EXIF orientation of a JPEG, 1 (upright) when absent or unreadable.
fn orientation(path: &Path, bytes: &[u8]) -> u16 {
    match Reader::new().read_from_container(&mut Cursor::new(bytes)) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| match &field.value {
                Value::Short(values) => values.first().copied(),
                _ => None,
            })
            .unwrap_or(1),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "no usable EXIF data");
            1
        }
    }
}

/// Loads a picture into a texture, turned upright according to its EXIF
/// orientation. Mirrored orientations are shown unmirrored.
pub fn load_texture_with_exif_rotation(rl: &mut RaylibHandle, thread: &RaylibThread, path: &Path) -> Result<Texture2D> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;

    let extension = extension(path);
    let orientation = if extension == "jpg" || extension == "jpeg" { orientation(path, &bytes) } else { 1 };

    let mut image = Image::load_image_from_mem(&format!(".{extension}"), &bytes)
        .map_err(|e| anyhow!("failed to decode {}: {}", path.display(), e))?;

    match orientation {
        3 => {
            image.rotate_cw();
            image.rotate_cw();
        }
        6 => image.rotate_cw(),
        8 => image.rotate_ccw(),
        _ => {}
    }
    debug!(path = %path.display(), orientation, "picture decoded");

    rl.load_texture_from_image(thread, &image)
        .map_err(|e| anyhow!("failed to create texture for {}: {}", path.display(), e))
}
