use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use zarrs::array::Array;
use zarrs::filesystem::FilesystemStore;
use zarrs::group::Group;

use crate::error::{InspectError, Result};
use crate::summary::{DatasetSummary, DimensionSummary, VariableSummary};

/// The xarray convention for naming zarr array dimensions.
const ARRAY_DIMENSIONS_ATTR: &str = "_ARRAY_DIMENSIONS";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    NetCdf,
    Zarr,
}

/// Route a source to a backend. Directories and `.zarr` suffixes go to the
/// zarr backend, everything else (including DAP URLs) to libnetcdf. This is
/// routing only; a misdetected source fails at open time like any other bad
/// input.
pub fn source_kind(source: &str) -> SourceKind {
    if source.ends_with(".zarr") || Path::new(source).is_dir() {
        SourceKind::Zarr
    } else {
        SourceKind::NetCdf
    }
}

/// Open a source and distill its structural metadata. The underlying handle
/// is scoped to this call and released before it returns.
pub fn open_summary(source: &str) -> Result<DatasetSummary> {
    let kind = source_kind(source);
    log::debug!("opening {source} as {kind:?}");
    match kind {
        SourceKind::NetCdf => netcdf_summary(source),
        SourceKind::Zarr => zarr_summary(source),
    }
}

fn open_error(source: &str, err: impl std::error::Error + Send + Sync + 'static) -> InspectError {
    InspectError::DatasetOpen {
        path: source.to_string(),
        source: Box::new(err),
    }
}

fn netcdf_summary(source: &str) -> Result<DatasetSummary> {
    let file = netcdf::open(source).map_err(|err| open_error(source, err))?;

    let mut dimensions = Vec::new();
    for dim in file.dimensions() {
        dimensions.push(DimensionSummary {
            name: dim.name().to_string(),
            len: dim.len(),
            unlimited: dim.is_unlimited(),
        });
    }

    let mut variables = Vec::new();
    for var in file.variables() {
        let dtype = dtype_name(&var.vartype());
        let mut dims = Vec::new();
        let mut elements: u64 = 1;
        for dim in var.dimensions() {
            elements = elements.saturating_mul(dim.len() as u64);
            dims.push(dim.name().to_string());
        }
        let attributes = var
            .attributes()
            .map(|attr| (attr.name().to_string(), attr_value(&attr)))
            .collect();
        variables.push(VariableSummary {
            name: var.name().to_string(),
            nbytes: elements.saturating_mul(dtype_width(&dtype)),
            dtype,
            dims,
            attributes,
        });
    }

    let attributes = file
        .attributes()
        .map(|attr| (attr.name().to_string(), attr_value(&attr)))
        .collect();

    Ok(DatasetSummary {
        source: source.to_string(),
        dimensions,
        variables,
        attributes,
    })
}

fn zarr_summary(source: &str) -> Result<DatasetSummary> {
    let store = Arc::new(FilesystemStore::new(source).map_err(|err| open_error(source, err))?);

    let mut dimensions = Vec::new();

    // A store rooted at a single array has no group metadata; the lone
    // variable is named after the store itself.
    if let Ok(array) = Array::open(store.clone(), "/") {
        let name = store_base_name(source);
        let variable = variable_from_array(&name, &array, &mut dimensions);
        return Ok(DatasetSummary {
            source: source.to_string(),
            dimensions,
            variables: vec![variable],
            attributes: Vec::new(),
        });
    }

    let group = Group::open(store.clone(), "/").map_err(|err| open_error(source, err))?;
    let attributes = group
        .attributes()
        .iter()
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    let mut variables = Vec::new();
    for name in child_array_names(source)? {
        match Array::open(store.clone(), &format!("/{name}")) {
            Ok(array) => variables.push(variable_from_array(&name, &array, &mut dimensions)),
            // zarr.json children can also be subgroups; those are skipped.
            Err(err) => log::debug!("skipping child node {name}: {err}"),
        }
    }

    Ok(DatasetSummary {
        source: source.to_string(),
        dimensions,
        variables,
        attributes,
    })
}

/// Child nodes of a zarr group store, one level deep. xarray-style datasets
/// keep all their arrays at the root group.
fn child_array_names(source: &str) -> Result<Vec<String>> {
    let mut names = Vec::new();
    let entries = fs::read_dir(source).map_err(|err| open_error(source, err))?;
    for entry in entries {
        let entry = entry.map_err(|err| open_error(source, err))?;
        let path = entry.path();
        if path.join(".zarray").is_file() || path.join("zarr.json").is_file() {
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}

fn variable_from_array(
    name: &str,
    array: &Array<FilesystemStore>,
    dimensions: &mut Vec<DimensionSummary>,
) -> VariableSummary {
    let shape = array.shape();

    let mut attributes = Vec::new();
    let mut dims: Option<Vec<String>> = None;
    for (key, value) in array.attributes() {
        if key == ARRAY_DIMENSIONS_ATTR {
            // Dimension names ride along as an attribute; hide it from the
            // listing like xarray does.
            dims = value.as_array().map(|names| {
                names
                    .iter()
                    .filter_map(|v| v.as_str())
                    .map(str::to_string)
                    .collect()
            });
        } else {
            attributes.push((key.clone(), value.clone()));
        }
    }
    let dims =
        dims.unwrap_or_else(|| (0..shape.len()).map(|axis| format!("dim_{axis}")).collect());

    for (dim, len) in dims.iter().zip(shape.iter()) {
        if !dimensions.iter().any(|d| &d.name == dim) {
            dimensions.push(DimensionSummary {
                name: dim.clone(),
                len: *len as usize,
                unlimited: false,
            });
        }
    }

    let elements: u64 = shape.iter().product();
    let width = array.data_type().fixed_size().unwrap_or(0) as u64;
    VariableSummary {
        name: name.to_string(),
        dtype: normalize_dtype(&format!("{:?}", array.data_type())),
        dims,
        attributes,
        nbytes: elements.saturating_mul(width),
    }
}

fn store_base_name(source: &str) -> String {
    Path::new(source)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("data")
        .to_string()
}

/// libnetcdf spells its types like `Basic(Float)`; zarr like `Float32`.
fn dtype_name(vartype: &netcdf::types::VariableType) -> String {
    normalize_dtype(&format!("{vartype:?}"))
}

fn normalize_dtype(raw: &str) -> String {
    let inner = raw
        .strip_prefix("Basic(")
        .and_then(|rest| rest.strip_suffix(')'))
        .unwrap_or(raw);
    match inner {
        "Byte" | "Schar" => "int8",
        "Ubyte" | "Uchar" => "uint8",
        "Char" => "char",
        "Short" => "int16",
        "Ushort" => "uint16",
        "Int" => "int32",
        "Uint" => "uint32",
        "Longlong" | "Int64" => "int64",
        "Ulonglong" | "Uint64" => "uint64",
        "Float" => "float32",
        "Double" => "float64",
        "String" => "string",
        other => return other.to_ascii_lowercase(),
    }
    .to_string()
}

/// Bytes per element for the size estimate; 0 when the width is not fixed.
fn dtype_width(dtype: &str) -> u64 {
    match dtype {
        "int8" | "uint8" | "char" | "bool" => 1,
        "int16" | "uint16" => 2,
        "int32" | "uint32" | "float32" => 4,
        "int64" | "uint64" | "float64" => 8,
        _ => 0,
    }
}

fn attr_value(attr: &netcdf::Attribute) -> Value {
    match attr.value() {
        Ok(value) => attr_to_json(value),
        Err(err) => {
            log::debug!("unreadable attribute {}: {err}", attr.name());
            Value::Null
        }
    }
}

fn attr_to_json(value: netcdf::AttrValue) -> Value {
    use netcdf::AttrValue::*;
    match value {
        Uchar(v) => v.into(),
        Schar(v) => v.into(),
        Ushort(v) => v.into(),
        Short(v) => v.into(),
        Uint(v) => v.into(),
        Int(v) => v.into(),
        Ulonglong(v) => v.into(),
        Longlong(v) => v.into(),
        Float(v) => json_float(f64::from(v)),
        Double(v) => json_float(v),
        Str(v) => Value::String(v),
        Uchars(v) => v.into(),
        Schars(v) => v.into(),
        Ushorts(v) => v.into(),
        Shorts(v) => v.into(),
        Uints(v) => v.into(),
        Ints(v) => v.into(),
        Ulonglongs(v) => v.into(),
        Longlongs(v) => v.into(),
        Floats(v) => Value::Array(v.into_iter().map(|x| json_float(f64::from(x))).collect()),
        Doubles(v) => Value::Array(v.into_iter().map(json_float).collect()),
        Strs(v) => v.into(),
        other => Value::String(format!("{other:?}")),
    }
}

/// JSON numbers cannot hold NaN/Inf; fall back to their string spelling
/// (common in `_FillValue` attributes).
fn json_float(v: f64) -> Value {
    match serde_json::Number::from_f64(v) {
        Some(num) => Value::Number(num),
        None => Value::String(v.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zarr_suffix_routes_to_zarr() {
        assert_eq!(source_kind("data/precip.zarr"), SourceKind::Zarr);
    }

    #[test]
    fn test_plain_files_and_urls_route_to_netcdf() {
        assert_eq!(source_kind("data/tas.nc"), SourceKind::NetCdf);
        assert_eq!(source_kind("no-such-file.grb"), SourceKind::NetCdf);
        assert_eq!(source_kind("https://host/dap/tas.nc"), SourceKind::NetCdf);
    }

    #[test]
    fn test_directories_route_to_zarr() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            source_kind(dir.path().to_str().unwrap()),
            SourceKind::Zarr
        );
    }

    #[test]
    fn test_normalize_dtype() {
        assert_eq!(normalize_dtype("Basic(Float)"), "float32");
        assert_eq!(normalize_dtype("Basic(Double)"), "float64");
        assert_eq!(normalize_dtype("Basic(Int)"), "int32");
        assert_eq!(normalize_dtype("String"), "string");
        assert_eq!(normalize_dtype("Float32"), "float32");
        assert_eq!(normalize_dtype("Uint64"), "uint64");
        assert_eq!(normalize_dtype("Bool"), "bool");
    }

    #[test]
    fn test_dtype_width() {
        assert_eq!(dtype_width("uint8"), 1);
        assert_eq!(dtype_width("int16"), 2);
        assert_eq!(dtype_width("float32"), 4);
        assert_eq!(dtype_width("float64"), 8);
        assert_eq!(dtype_width("string"), 0);
    }

    #[test]
    fn test_json_float_handles_non_finite() {
        assert_eq!(json_float(1.5), serde_json::json!(1.5));
        assert_eq!(json_float(f64::NAN), Value::String("NaN".to_string()));
    }

    #[test]
    fn test_store_base_name() {
        assert_eq!(store_base_name("data/precip.zarr"), "precip");
        assert_eq!(store_base_name("store"), "store");
    }
}
