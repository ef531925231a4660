use image::GrayImage;
use std::path::Path;
use tracing::{debug, info};

use super::GridLayout;
use crate::core::manifest::Label;

/// Loads an image as a single-channel pixel grid.
///
/// Returns `None` for anything that cannot be shown: missing file, decode
/// failure or a zero-sized image. Never panics on a bad path.
pub trait ImageLoader {
    fn load_gray(&self, path: &Path) -> Option<GrayImage>;
}

/// Loads images from disk with the `image` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsImageLoader;

impl ImageLoader for FsImageLoader {
    fn load_gray(&self, path: &Path) -> Option<GrayImage> {
        match image::open(path) {
            Ok(img) => {
                let gray = img.to_luma8();
                if gray.width() == 0 || gray.height() == 0 {
                    return None;
                }
                Some(gray)
            }
            Err(e) => {
                debug!("Could not decode {:?}: {}", path, e);
                None
            }
        }
    }
}

/// One labeled image ready for display.
#[derive(Debug, Clone)]
pub struct Tile {
    pub name: String,
    pub label: Label,
    pub image: GrayImage,
}

/// Renders loaded samples for a human. Nothing it does feeds back into the
/// sampling result.
pub trait GridPresenter {
    fn present(&mut self, tiles: Vec<Tile>, layout: GridLayout);
}

/// Presenter for headless runs: logs where each tile would go.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogPresenter;

impl GridPresenter for LogPresenter {
    fn present(&mut self, tiles: Vec<Tile>, layout: GridLayout) {
        info!(
            "Preview grid {}x{} with {} tiles",
            layout.cols,
            layout.rows,
            tiles.len()
        );
        for (index, tile) in tiles.iter().enumerate() {
            if let Some((row, col)) = layout.position(index) {
                info!(
                    "  [{}, {}] {} label {} ({}x{})",
                    row,
                    col,
                    tile.name,
                    tile.label,
                    tile.image.width(),
                    tile.image.height()
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;
    use tempfile::tempdir;

    #[test]
    fn test_fs_loader_reads_png_as_gray() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("digit.png");
        image::RgbImage::from_pixel(4, 3, image::Rgb([200, 10, 10]))
            .save(&path)
            .unwrap();

        let gray = FsImageLoader.load_gray(&path).unwrap();

        assert_eq!(gray.dimensions(), (4, 3));
    }

    #[test]
    fn test_fs_loader_missing_file_is_none() {
        let dir = tempdir().unwrap();
        assert!(FsImageLoader.load_gray(&dir.path().join("nope.png")).is_none());
    }

    #[test]
    fn test_fs_loader_garbage_is_none() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not an image").unwrap();
        assert!(FsImageLoader.load_gray(&path).is_none());
    }

    #[test]
    fn test_log_presenter_accepts_tiles() {
        let tiles = vec![Tile {
            name: "a.png".to_string(),
            label: Label::ALL[1],
            image: GrayImage::from_pixel(2, 2, Luma([0])),
        }];
        LogPresenter.present(tiles, GridLayout::for_count(1));
    }
}
