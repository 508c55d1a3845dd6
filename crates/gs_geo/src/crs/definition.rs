// crates/gs_geo/src/crs/definition.rs

//! CRS 定义文本
//!
//! 支持：
//!
//! - `EPSG:4326`、`epsg:4326`、`urn:ogc:def:crs:EPSG::4326`
//! - `OGC:CRS84`（经度在前的 WGS 84）
//! - 带 `AUTHORITY["EPSG","n"]` 或 `ID["EPSG",n]` 的 WKT
//! - PROJ 字符串（`longlat`、`utm`、`tmerc`、`webmerc`、`sterea`）

use super::{catalog, AxisOrder, CrsSpec};
use crate::datum::Datum;
use crate::ellipsoid::Ellipsoid;
use crate::error::{GeoError, GeoResult};
use crate::operation::helmert::Helmert;
use crate::projection::web_mercator::WEB_MERCATOR_RADIUS;
use crate::projection::{
    ObliqueStereographicParams, Projection, TransverseMercatorParams, WebMercator,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// CRS 定义
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrsDefinition {
    /// EPSG 代码
    Epsg(u32),
    /// 经度在前的 WGS 84
    Crs84,
    /// PROJ 字符串
    Proj4(String),
    /// WKT 文本
    Wkt(String),
}

impl CrsDefinition {
    /// 识别定义文本的格式
    ///
    /// # Errors
    ///
    /// 无法识别格式时返回 `GeoError::CrsParseFailed`。
    pub fn parse(text: &str) -> GeoResult<Self> {
        let s = text.trim();
        if s.is_empty() {
            return Err(GeoError::parse_failed(text, "定义为空"));
        }
        let upper = s.to_ascii_uppercase();
        if upper == "OGC:CRS84" || upper == "CRS:84" {
            return Ok(Self::Crs84);
        }
        if let Some(rest) = upper.strip_prefix("EPSG:") {
            return rest
                .trim()
                .parse()
                .map(Self::Epsg)
                .map_err(|_| GeoError::parse_failed(text, "EPSG 代码不是整数"));
        }
        if upper.starts_with("URN:OGC:DEF:CRS:EPSG:") {
            return upper
                .rsplit(':')
                .next()
                .and_then(|code| code.parse().ok())
                .map(Self::Epsg)
                .ok_or_else(|| GeoError::parse_failed(text, "URN 中缺少 EPSG 代码"));
        }
        if s.starts_with('+') || s.contains("+proj=") {
            return Ok(Self::Proj4(s.to_string()));
        }
        if s.contains('[') {
            return Ok(Self::Wkt(s.to_string()));
        }
        Err(GeoError::parse_failed(text, "无法识别的定义格式"))
    }

    /// 转为 PROJ 兼容的字符串
    #[must_use]
    pub fn to_proj_string(&self) -> String {
        match self {
            Self::Epsg(code) => format!("EPSG:{code}"),
            Self::Crs84 => "OGC:CRS84".to_string(),
            Self::Proj4(s) | Self::Wkt(s) => s.clone(),
        }
    }

    /// 获取 EPSG 代码（如果有）
    #[must_use]
    pub fn epsg_code(&self) -> Option<u32> {
        match self {
            Self::Epsg(code) => Some(*code),
            Self::Crs84 | Self::Proj4(_) => None,
            Self::Wkt(s) => parse_wkt_authority(s),
        }
    }

    /// 解析为结构化参数
    ///
    /// # Errors
    ///
    /// EPSG 代码不在目录中、WKT 缺少权威代码或 PROJ 字符串不受支持时返回错误。
    pub fn to_spec(&self) -> GeoResult<CrsSpec> {
        match self {
            Self::Epsg(code) => catalog::lookup(*code),
            Self::Crs84 => {
                let mut spec = catalog::wgs84_geographic()
                    .with_axis_order(AxisOrder::EastNorth)
                    .with_definition("OGC:CRS84");
                spec.epsg = None;
                spec.name = "WGS 84 (CRS84)".to_string();
                Ok(spec)
            }
            Self::Wkt(s) => {
                let code = parse_wkt_authority(s)
                    .ok_or_else(|| GeoError::parse_failed(s.as_str(), "WKT 中缺少 EPSG 权威代码"))?;
                Ok(catalog::lookup(code)?.with_definition(s.as_str()))
            }
            Self::Proj4(s) => parse_proj_string(s),
        }
    }
}

/// 从 WKT 的 `AUTHORITY["EPSG","n"]`（WKT1）或 `ID["EPSG",n]`（WKT2）提取代码
///
/// 取最后一个出现的权威代码，即最外层 CRS 的代码。
fn parse_wkt_authority(s: &str) -> Option<u32> {
    if let Some(pos) = s.rfind("AUTHORITY[\"EPSG\",\"") {
        let start = pos + 18;
        if let Some(end) = s[start..].find('"') {
            return s[start..start + end].parse().ok();
        }
    }
    if let Some(pos) = s.rfind("ID[\"EPSG\",") {
        let start = pos + 10;
        if let Some(end) = s[start..].find(|c| c == ']' || c == ',') {
            return s[start..start + end].trim().parse().ok();
        }
    }
    None
}

// ============================================================================
// PROJ 字符串
// ============================================================================

fn parse_proj_string(text: &str) -> GeoResult<CrsSpec> {
    let mut params: HashMap<&str, Option<&str>> = HashMap::new();
    for token in text.split_whitespace() {
        let token = token.trim_start_matches('+');
        match token.split_once('=') {
            Some((key, value)) => params.insert(key, Some(value)),
            None => params.insert(token, None),
        };
    }

    let number = |key: &'static str, default: f64| -> GeoResult<f64> {
        match params.get(key).copied().flatten() {
            Some(v) => v
                .parse()
                .map_err(|_| GeoError::invalid_parameter(key, v, "不是数值")),
            None => Ok(default),
        }
    };

    let datum = proj_datum(text, &params)?;
    let ellipsoid = datum.ellipsoid;

    let proj = params
        .get("proj")
        .copied()
        .flatten()
        .ok_or_else(|| GeoError::parse_failed(text, "缺少 +proj"))?;

    let projection = match proj {
        "longlat" | "latlong" | "lonlat" | "latlon" => {
            return Ok(CrsSpec::geographic("unknown", datum).with_definition(text));
        }
        "utm" => {
            let zone = number("zone", f64::NAN)?;
            if !(1.0..=60.0).contains(&zone) || zone.fract() != 0.0 {
                return Err(GeoError::invalid_parameter("zone", zone, "UTM 带号须为 1..=60"));
            }
            let north = !params.contains_key("south");
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let zone = zone as u8;
            Projection::transverse_mercator(TransverseMercatorParams::utm(zone, north, ellipsoid))
        }
        "tmerc" => {
            if number("lat_0", 0.0)? != 0.0 {
                return Err(GeoError::invalid_parameter(
                    "lat_0",
                    number("lat_0", 0.0)?,
                    "仅支持赤道原点",
                ));
            }
            let k = number("k_0", number("k", 1.0)?)?;
            Projection::transverse_mercator(TransverseMercatorParams {
                ellipsoid,
                central_meridian: number("lon_0", 0.0)?,
                scale_factor: k,
                false_easting: number("x_0", 0.0)?,
                false_northing: number("y_0", 0.0)?,
            })
        }
        "webmerc" => Projection::WebMercator(WebMercator),
        "merc"
            if number("a", 0.0)? == WEB_MERCATOR_RADIUS
                && number("b", 0.0)? == WEB_MERCATOR_RADIUS =>
        {
            Projection::WebMercator(WebMercator)
        }
        "sterea" => {
            let k = number("k_0", number("k", 1.0)?)?;
            Projection::oblique_stereographic(ObliqueStereographicParams {
                ellipsoid,
                lat_origin: number("lat_0", 0.0)?,
                lon_origin: number("lon_0", 0.0)?,
                scale_factor: k,
                false_easting: number("x_0", 0.0)?,
                false_northing: number("y_0", 0.0)?,
            })
        }
        other => {
            return Err(GeoError::parse_failed(text, format!("不支持的投影 '{other}'")));
        }
    };

    Ok(CrsSpec::projected("unknown", datum, projection).with_definition(text))
}

fn proj_datum(text: &str, params: &HashMap<&str, Option<&str>>) -> GeoResult<Datum> {
    if let Some(Some(datum)) = params.get("datum") {
        return match datum.to_ascii_uppercase().as_str() {
            "WGS84" => Ok(Datum::wgs84()),
            other => Err(GeoError::parse_failed(text, format!("不支持的基准 '{other}'"))),
        };
    }

    let (ellipsoid, ellps_name) = match params.get("ellps").copied().flatten() {
        Some("WGS84") | None => (Ellipsoid::WGS84, "WGS 84"),
        Some("GRS80") => (Ellipsoid::GRS80, "GRS 1980"),
        Some("bessel") => (Ellipsoid::BESSEL_1841, "Bessel 1841"),
        Some("krass") => (Ellipsoid::KRASSOVSKY, "Krassowsky 1940"),
        Some("intl") => (Ellipsoid::INTERNATIONAL_1924, "International 1924"),
        Some(other) => {
            return Err(GeoError::parse_failed(text, format!("不支持的椭球 '{other}'")));
        }
    };

    let towgs84 = match params.get("towgs84").copied().flatten() {
        Some(list) => {
            let values = list
                .split(',')
                .map(|v| v.trim().parse::<f64>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|_| GeoError::invalid_parameter("towgs84", list, "不是数值列表"))?;
            match values.as_slice() {
                [tx, ty, tz] => Some(Helmert::translation(*tx, *ty, *tz)),
                [tx, ty, tz, rx, ry, rz, ds] => {
                    Some(Helmert::seven_parameter(*tx, *ty, *tz, *rx, *ry, *rz, *ds))
                }
                _ => {
                    return Err(GeoError::invalid_parameter(
                        "towgs84",
                        list,
                        "需要 3 或 7 个参数",
                    ))
                }
            }
        }
        None => None,
    };

    let is_null_shift = towgs84.is_some_and(|h| h == Helmert::null());
    if is_null_shift && ellipsoid.approx_eq(&Ellipsoid::WGS84) {
        return Ok(Datum::wgs84());
    }

    let datum = Datum::custom(format!("Unknown based on {ellps_name} ellipsoid"), ellipsoid);
    Ok(match towgs84 {
        Some(h) => datum.with_to_wgs84(h),
        None => datum,
    })
}
