use crate::grid::Snapshot;
use anyhow::{Context, Result};
use image::{Rgba, RgbaImage};
use std::path::Path;

const OCCUPIED: Rgba<u8> = Rgba([255, 255, 255, 255]);
const EMPTY: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// One pixel per cell: occupied cells white, empty cells black
pub fn render(snapshot: &Snapshot) -> RgbaImage {
    RgbaImage::from_fn(snapshot.size_x as u32, snapshot.size_y as u32, |x, y| {
        if snapshot.is_occupied(x as usize, y as usize) {
            OCCUPIED
        } else {
            EMPTY
        }
    })
}

/// Render the snapshot and write it as a PNG
pub fn save_png(snapshot: &Snapshot, path: &Path) -> Result<()> {
    render(snapshot)
        .save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("Failed to export image to '{}'", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use tempfile::tempdir;

    fn sample_snapshot() -> Snapshot {
        let grid = Grid::new(5, 3);
        grid.seed_center();
        grid.place(4, 0);
        grid.into_snapshot()
    }

    #[test]
    fn test_render_maps_cells_to_pixels() {
        let img = render(&sample_snapshot());
        assert_eq!(img.dimensions(), (5, 3));
        assert_eq!(*img.get_pixel(2, 1), OCCUPIED);
        assert_eq!(*img.get_pixel(4, 0), OCCUPIED);
        assert_eq!(*img.get_pixel(0, 0), EMPTY);
        // x is the column, y the row
        assert_eq!(*img.get_pixel(0, 2), EMPTY);

        let white = img.pixels().filter(|p| **p == OCCUPIED).count();
        assert_eq!(white, 2);
    }

    #[test]
    fn test_save_png_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("DLA.out.png");
        save_png(&sample_snapshot(), &path).unwrap();

        let loaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(loaded.dimensions(), (5, 3));
        assert_eq!(*loaded.get_pixel(4, 0), OCCUPIED);
        assert_eq!(*loaded.get_pixel(1, 1), EMPTY);
    }

    #[test]
    fn test_save_png_reports_bad_path() {
        let err = save_png(&sample_snapshot(), Path::new("/nonexistent/dir/out.png")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/dir/out.png"));
    }
}
