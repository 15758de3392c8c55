//! Regeneration decision for a single figure.
//!
//! Pure functions: no I/O, no logging. The checks run in a fixed order and
//! the first failing one names the skip reason:
//!
//! 1. the figure embeds an image with a `resource`
//! 2. `typeof` is exactly [`THUMBNAIL_TYPEOF`](crate::models::THUMBNAIL_TYPEOF)
//! 3. the class list carries [`DEFAULT_SIZE_CLASS`]
//! 4. metadata for the image was resolved
//! 5. the image is portrait (`height > width`)

use crate::models::{DEFAULT_SIZE_CLASS, FigureNode, FigureVerdict, ImageMetadata, SkipReason};

/// Checks 1-3. Returns the normalized resource name to resolve metadata for.
pub fn candidate(figure: &FigureNode) -> Result<String, SkipReason> {
    let resource = figure.resource_name().ok_or(SkipReason::MissingImage)?;
    if !figure.is_thumbnail() {
        return Err(SkipReason::NotThumbnail);
    }
    if !figure.has_class(DEFAULT_SIZE_CLASS) {
        return Err(SkipReason::ExplicitSize);
    }
    Ok(resource)
}

/// Full decision given the metadata resolved for the figure's image.
pub fn evaluate(figure: &FigureNode, metadata: Option<&ImageMetadata>) -> FigureVerdict {
    if let Err(reason) = candidate(figure) {
        return FigureVerdict::Skip(reason);
    }
    match metadata {
        None => FigureVerdict::Skip(SkipReason::UnresolvableImage),
        Some(metadata) if !metadata.is_portrait() => FigureVerdict::Skip(SkipReason::NotPortrait),
        Some(_) => FigureVerdict::Regenerate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MediaType;

    fn thumb(resource: Option<&str>) -> FigureNode {
        FigureNode::new(
            Some("mw:Image/Thumb"),
            Some("mw-default-size mw-halign-right"),
            resource,
        )
    }

    fn meta(width: u32, height: u32) -> ImageMetadata {
        ImageMetadata::new("File:Foo.jpg", width, height, MediaType::Bitmap)
    }

    #[test]
    fn test_portrait_default_thumb_regenerates() {
        let figure = thumb(Some("./File:Foo.jpg"));
        assert_eq!(candidate(&figure), Ok("File:Foo.jpg".to_string()));
        assert_eq!(evaluate(&figure, Some(&meta(100, 200))), FigureVerdict::Regenerate);
    }

    #[test]
    fn test_landscape_and_square_are_skipped() {
        let figure = thumb(Some("./File:Foo.jpg"));
        for (w, h) in [(200, 100), (200, 200), (1, 1), (0, 0)] {
            assert_eq!(
                evaluate(&figure, Some(&meta(w, h))),
                FigureVerdict::Skip(SkipReason::NotPortrait)
            );
        }
    }

    #[test]
    fn test_missing_image_checked_first() {
        let figure = FigureNode::new(Some("mw:Image/Frame"), None, None);
        assert_eq!(candidate(&figure), Err(SkipReason::MissingImage));
        assert_eq!(
            evaluate(&figure, Some(&meta(100, 200))),
            FigureVerdict::Skip(SkipReason::MissingImage)
        );
    }

    #[test]
    fn test_non_thumbnail_skipped() {
        let figure = FigureNode::new(
            Some("mw:Image/Frameless"),
            Some("mw-default-size"),
            Some("./File:Foo.jpg"),
        );
        assert_eq!(
            evaluate(&figure, Some(&meta(100, 200))),
            FigureVerdict::Skip(SkipReason::NotThumbnail)
        );
    }

    #[test]
    fn test_explicit_size_skipped_regardless_of_dimensions() {
        let figure = FigureNode::new(
            Some("mw:Image/Thumb"),
            Some("mw-halign-left"),
            Some("./File:Foo.jpg"),
        );
        for (w, h) in [(100, 200), (200, 100), (5, 5000)] {
            assert_eq!(
                evaluate(&figure, Some(&meta(w, h))),
                FigureVerdict::Skip(SkipReason::ExplicitSize)
            );
        }
    }

    #[test]
    fn test_unresolved_metadata() {
        let figure = thumb(Some("./File:Foo.jpg"));
        assert_eq!(
            evaluate(&figure, None),
            FigureVerdict::Skip(SkipReason::UnresolvableImage)
        );
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let figure = thumb(Some("../File:Foo.jpg"));
        let metadata = meta(300, 400);
        let first = evaluate(&figure, Some(&metadata));
        for _ in 0..10 {
            assert_eq!(evaluate(&figure, Some(&metadata)), first);
        }
    }
}
