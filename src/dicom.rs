use anyhow::{anyhow, bail, Result};
use byteorder::{ByteOrder, LittleEndian};
use dicom_core::Tag;
use dicom_object::{open_file, DefaultDicomObject};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

use crate::grid::{Image, PixelSpacing};

/// Study description every band assessment scan carries
pub const BAND_ASSESSMENT_STUDY: &str = "Band Assessment";

const STUDY_DESCRIPTION: Tag = Tag(0x0008, 0x1030);
const DEVICE_SERIAL_NUMBER: Tag = Tag(0x0018, 0x1000);
const KVP: Tag = Tag(0x0018, 0x0060);
const SLICE_THICKNESS: Tag = Tag(0x0018, 0x0050);
const TUBE_CURRENT: Tag = Tag(0x0018, 0x1151);
const CONVOLUTION_KERNEL: Tag = Tag(0x0018, 0x1210);
const TOTAL_COLLIMATION_WIDTH: Tag = Tag(0x0018, 0x9307);
const SERIES_NUMBER: Tag = Tag(0x0020, 0x0011);
const INSTANCE_NUMBER: Tag = Tag(0x0020, 0x0013);
const ROWS: Tag = Tag(0x0028, 0x0010);
const COLUMNS: Tag = Tag(0x0028, 0x0011);
const PIXEL_SPACING: Tag = Tag(0x0028, 0x0030);
const BITS_ALLOCATED: Tag = Tag(0x0028, 0x0100);
const PIXEL_REPRESENTATION: Tag = Tag(0x0028, 0x0103);
const RESCALE_INTERCEPT: Tag = Tag(0x0028, 0x1052);
const RESCALE_SLOPE: Tag = Tag(0x0028, 0x1053);
const PIXEL_DATA: Tag = Tag(0x7FE0, 0x0010);

const IMPLICIT_VR_LITTLE_ENDIAN: &str = "1.2.840.10008.1.2";
const EXPLICIT_VR_LITTLE_ENDIAN: &str = "1.2.840.10008.1.2.1";

/// Acquisition parameters recorded alongside each profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AcquisitionInfo {
    pub serial_number: String,
    pub study_description: String,
    pub kvp: f64,
    pub tube_current: i32,
    pub kernel: String,
    pub series: i32,
    pub total_collimation: f64,
    pub slice_thickness: f64,
    pub instance: i32,
}

impl AcquisitionInfo {
    /// Scan mode label used for exported file names,
    /// e.g. `12345_120Kv_200mA_B30f_38.4I5_3`.
    pub fn label(&self) -> String {
        format!(
            "{}_{}Kv_{}mA_{}_{}I{}_{}",
            self.serial_number,
            self.kvp,
            self.tube_current,
            self.kernel,
            self.total_collimation,
            self.slice_thickness,
            self.instance
        )
    }
}

/// A calibrated CT slice read from a DICOM file.
pub struct DicomSlice {
    pub info: AcquisitionInfo,
    pub image: Image,
}

impl DicomSlice {
    pub fn from_file(path: &Path) -> Result<Self> {
        info!("Opening file: {}", path.display());
        let obj = open_file(path)
            .map_err(|e| anyhow!("Failed to open DICOM file {}: {}", path.display(), e))?;

        let study_description = read_string(&obj, STUDY_DESCRIPTION, "StudyDescription")?;
        if study_description != BAND_ASSESSMENT_STUDY {
            bail!(
                "{} is not a {} scan (study description: {:?})",
                path.display(),
                BAND_ASSESSMENT_STUDY,
                study_description
            );
        }

        let info = AcquisitionInfo {
            serial_number: read_string(&obj, DEVICE_SERIAL_NUMBER, "DeviceSerialNumber")?,
            study_description,
            kvp: read_f64(&obj, KVP, "KVP")?,
            tube_current: read_i32(&obj, TUBE_CURRENT, "XRayTubeCurrent")?,
            kernel: read_string(&obj, CONVOLUTION_KERNEL, "ConvolutionKernel")?,
            series: read_i32(&obj, SERIES_NUMBER, "SeriesNumber")?,
            total_collimation: read_f64(&obj, TOTAL_COLLIMATION_WIDTH, "TotalCollimationWidth")?,
            slice_thickness: read_f64(&obj, SLICE_THICKNESS, "SliceThickness")?,
            instance: read_i32(&obj, INSTANCE_NUMBER, "InstanceNumber")?,
        };
        debug!("Image mode: {}", info.label());

        let image = read_image(&obj)?;
        Ok(DicomSlice { info, image })
    }
}

fn read_image(obj: &DefaultDicomObject) -> Result<Image> {
    let transfer_syntax = obj.meta().transfer_syntax().trim_end_matches(['\0', ' ']);
    if transfer_syntax != IMPLICIT_VR_LITTLE_ENDIAN && transfer_syntax != EXPLICIT_VR_LITTLE_ENDIAN
    {
        bail!("Unsupported transfer syntax {}: only native little endian pixel data is read", transfer_syntax);
    }

    let rows = read_i32(obj, ROWS, "Rows")? as usize;
    let cols = read_i32(obj, COLUMNS, "Columns")? as usize;
    let bits_allocated = read_i32(obj, BITS_ALLOCATED, "BitsAllocated")?;
    let signed = read_i32(obj, PIXEL_REPRESENTATION, "PixelRepresentation")? == 1;
    let slope = read_f64(obj, RESCALE_SLOPE, "RescaleSlope")?;
    let intercept = read_f64(obj, RESCALE_INTERCEPT, "RescaleIntercept")?;

    let spacing = obj
        .element(PIXEL_SPACING)
        .map_err(|e| anyhow!("Missing PixelSpacing: {}", e))?
        .to_multi_float64()
        .map_err(|e| anyhow!("PixelSpacing is not numeric: {}", e))?;
    let spacing = match spacing.as_slice() {
        [row, col, ..] => PixelSpacing { row: *row, col: *col },
        [both] => PixelSpacing { row: *both, col: *both },
        [] => bail!("PixelSpacing has no values"),
    };

    if bits_allocated != 16 {
        bail!("Unsupported BitsAllocated {}: expected 16", bits_allocated);
    }

    let bytes = obj
        .element(PIXEL_DATA)
        .map_err(|e| anyhow!("Missing PixelData: {}", e))?
        .to_bytes()
        .map_err(|e| anyhow!("PixelData is not native: {}", e))?;

    let data = decode_pixels(&bytes, rows, cols, signed, slope, intercept)?;
    debug!(
        "Decoded {}x{} slice, slope {}, intercept {}, spacing {:?}",
        rows, cols, slope, intercept, spacing
    );
    Ok(Image::new(rows, cols, data, spacing)?)
}

/// Decode 16-bit little endian samples and apply the modality rescale.
pub fn decode_pixels(
    bytes: &[u8],
    rows: usize,
    cols: usize,
    signed: bool,
    slope: f64,
    intercept: f64,
) -> Result<Vec<f64>> {
    let count = rows * cols;
    // odd-length values are padded by one byte
    if bytes.len() < count * 2 {
        bail!(
            "Data size mismatch: expected {} bytes of pixel data, got {}",
            count * 2,
            bytes.len()
        );
    }
    let bytes = &bytes[..count * 2];

    let raw: Vec<f64> = if signed {
        let mut samples = vec![0i16; count];
        LittleEndian::read_i16_into(bytes, &mut samples);
        samples.into_iter().map(f64::from).collect()
    } else {
        let mut samples = vec![0u16; count];
        LittleEndian::read_u16_into(bytes, &mut samples);
        samples.into_iter().map(f64::from).collect()
    };

    Ok(raw.into_iter().map(|v| v * slope + intercept).collect())
}

fn read_string(obj: &DefaultDicomObject, tag: Tag, name: &str) -> Result<String> {
    let element = obj
        .element(tag)
        .map_err(|e| anyhow!("Missing {}: {}", name, e))?;
    let value = element
        .to_str()
        .map_err(|e| anyhow!("{} is not a string: {}", name, e))?;
    Ok(value.trim_end_matches(['\0', ' ']).to_string())
}

fn read_f64(obj: &DefaultDicomObject, tag: Tag, name: &str) -> Result<f64> {
    obj.element(tag)
        .map_err(|e| anyhow!("Missing {}: {}", name, e))?
        .to_float64()
        .map_err(|e| anyhow!("{} is not numeric: {}", name, e))
}

fn read_i32(obj: &DefaultDicomObject, tag: Tag, name: &str) -> Result<i32> {
    obj.element(tag)
        .map_err(|e| anyhow!("Missing {}: {}", name, e))?
        .to_int::<i32>()
        .map_err(|e| anyhow!("{} is not an integer: {}", name, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_info() -> AcquisitionInfo {
        AcquisitionInfo {
            serial_number: "70112".to_string(),
            study_description: BAND_ASSESSMENT_STUDY.to_string(),
            kvp: 120.0,
            tube_current: 200,
            kernel: "B30f".to_string(),
            series: 2,
            total_collimation: 38.4,
            slice_thickness: 5.0,
            instance: 3,
        }
    }

    #[test]
    fn test_label_format() {
        assert_eq!(sample_info().label(), "70112_120Kv_200mA_B30f_38.4I5_3");
    }

    #[test]
    fn test_decode_signed_with_rescale() {
        // -1000, 0, 24 as little endian i16
        let bytes = [0x18, 0xFC, 0x00, 0x00, 0x18, 0x00];
        let values = decode_pixels(&bytes, 1, 3, true, 1.0, 0.0).unwrap();
        assert_eq!(values, vec![-1000.0, 0.0, 24.0]);
    }

    #[test]
    fn test_decode_unsigned_with_rescale() {
        let bytes = [0x00, 0x00, 0xE8, 0x03, 0x00, 0x80, 0x01, 0x00];
        let values = decode_pixels(&bytes, 2, 2, false, 1.0, -1024.0).unwrap();
        assert_eq!(values, vec![-1024.0, -24.0, 31744.0, -1023.0]);
    }

    #[test]
    fn test_decode_ignores_padding_byte() {
        let bytes = [0x01, 0x00, 0xFF];
        let values = decode_pixels(&bytes, 1, 1, false, 2.0, 0.5).unwrap();
        assert_eq!(values, vec![2.5]);
    }

    #[test]
    fn test_decode_short_buffer() {
        assert!(decode_pixels(&[0x00, 0x01, 0x02], 1, 2, false, 1.0, 0.0).is_err());
    }
}
