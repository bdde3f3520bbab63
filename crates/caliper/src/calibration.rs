//! Calibration of world distances into display units.
//!
//! The overlay never inspects image metadata itself. It asks a
//! [`Calibration`] for the scale and unit of the image shown in a viewport and
//! divides world distances by that scale.

use serde::Deserialize;

/// Metadata of the image displayed in a viewport.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ImageMetadata {
    image_id: String,
    modality: Option<String>,
    /// Whether the image carries physical pixel spacing.
    has_pixel_spacing: bool,
    /// User-applied calibration factor, world units per display unit.
    calibration_scale: Option<f64>,
}

impl ImageMetadata {
    pub fn new(image_id: impl Into<String>) -> Self {
        Self {
            image_id: image_id.into(),
            ..Self::default()
        }
    }

    pub fn with_modality(mut self, modality: impl Into<String>) -> Self {
        self.modality = Some(modality.into());
        self
    }

    pub fn with_pixel_spacing(mut self, has_pixel_spacing: bool) -> Self {
        self.has_pixel_spacing = has_pixel_spacing;
        self
    }

    pub fn with_calibration_scale(mut self, scale: f64) -> Self {
        self.calibration_scale = Some(scale);
        self
    }

    pub fn image_id(&self) -> &str {
        &self.image_id
    }

    pub fn modality(&self) -> Option<&str> {
        self.modality.as_deref()
    }

    pub fn has_pixel_spacing(&self) -> bool {
        self.has_pixel_spacing
    }

    pub fn calibration_scale(&self) -> Option<f64> {
        self.calibration_scale
    }
}

/// Resolved scale and units for one image.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibratedScale {
    scale: f64,
    unit: String,
    area_unit: String,
}

impl CalibratedScale {
    /// Creates a scale; the area unit is the squared length unit.
    pub fn new(scale: f64, unit: impl Into<String>) -> Self {
        let unit = unit.into();
        let area_unit = format!("{unit}²");
        Self {
            scale,
            unit,
            area_unit,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn area_unit(&self) -> &str {
        &self.area_unit
    }
}

/// Resolves the calibrated scale of an image.
pub trait Calibration {
    /// `image` is `None` when the viewport shows no image.
    fn resolve(&self, image: Option<&ImageMetadata>) -> CalibratedScale;
}

/// Scale 1 in millimetres regardless of the image.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityCalibration;

impl Calibration for IdentityCalibration {
    fn resolve(&self, _image: Option<&ImageMetadata>) -> CalibratedScale {
        CalibratedScale::new(1.0, "mm")
    }
}

/// Calibration driven by [`ImageMetadata`].
///
/// A user calibration factor wins; otherwise images with pixel spacing are in
/// millimetres and anything else is measured in pixels.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataCalibration;

impl Calibration for MetadataCalibration {
    fn resolve(&self, image: Option<&ImageMetadata>) -> CalibratedScale {
        match image {
            Some(image) => match image.calibration_scale() {
                Some(scale) if scale > 0.0 => CalibratedScale::new(scale, "mm"),
                _ if image.has_pixel_spacing() => CalibratedScale::new(1.0, "mm"),
                _ => CalibratedScale::new(1.0, "px"),
            },
            None => CalibratedScale::new(1.0, "px"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_unit_is_squared() {
        let scale = CalibratedScale::new(2.0, "cm");
        assert_eq!(scale.area_unit(), "cm²");
    }

    #[test]
    fn test_metadata_calibration_units() {
        let calibration = MetadataCalibration;
        let plain = ImageMetadata::new("img");
        assert_eq!(calibration.resolve(Some(&plain)).unit(), "px");
        assert_eq!(calibration.resolve(None).unit(), "px");

        let spaced = plain.clone().with_pixel_spacing(true);
        assert_eq!(calibration.resolve(Some(&spaced)).unit(), "mm");

        let calibrated = plain.with_calibration_scale(0.5);
        let resolved = calibration.resolve(Some(&calibrated));
        assert_eq!(resolved.unit(), "mm");
        assert_eq!(resolved.scale(), 0.5);
    }
}
