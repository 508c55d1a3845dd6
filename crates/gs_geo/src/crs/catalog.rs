// crates/gs_geo/src/crs/catalog.rs

//! 内置 EPSG 目录
//!
//! | 代码 | 坐标系 |
//! |------|--------|
//! | 4326 | WGS 84（纬度在前） |
//! | 4258 | ETRS89（纬度在前） |
//! | 4289 | Amersfoort（纬度在前） |
//! | 4490 | CGCS2000（纬度在前） |
//! | 3857 | WGS 84 / Pseudo-Mercator |
//! | 32601-32660, 32701-32760 | WGS 84 / UTM |
//! | 25828-25838 | ETRS89 / UTM |
//! | 28992 | Amersfoort / RD New |
//! | 4502-4512 | CGCS2000 / 高斯-克吕格 6 度带（无带号） |
//! | 4534-4554 | CGCS2000 / 高斯-克吕格 3 度带（无带号） |

use super::{AxisOrder, CrsSpec};
use crate::area::UsageArea;
use crate::datum::Datum;
use crate::error::{GeoError, GeoResult};
use crate::projection::{
    ObliqueStereographicParams, Projection, TransverseMercatorParams, WebMercator,
};

// ============================================================================
// 使用范围
// ============================================================================

/// 欧洲（ETRS89 适用范围）
#[must_use]
pub fn europe() -> UsageArea {
    UsageArea::named("Europe - ETRS89", -16.1, 32.88, 40.18, 84.73)
}

/// 荷兰陆地
#[must_use]
pub fn netherlands() -> UsageArea {
    UsageArea::named("Netherlands - onshore", 3.2, 50.75, 7.22, 53.7)
}

/// 中国
#[must_use]
pub fn china() -> UsageArea {
    UsageArea::named("China", 73.62, 16.7, 134.77, 53.56)
}

// ============================================================================
// 查询
// ============================================================================

/// WGS 84 地理坐标系 (EPSG:4326)
#[must_use]
pub fn wgs84_geographic() -> CrsSpec {
    geographic(4326, Datum::wgs84(), UsageArea::world())
}

fn geographic(code: u32, datum: Datum, area: UsageArea) -> CrsSpec {
    let name = match code {
        4490 => "China Geodetic Coordinate System 2000".to_string(),
        _ => datum.name.clone(),
    };
    CrsSpec::geographic(name, datum)
        .with_axis_order(AxisOrder::NorthEast)
        .with_epsg(code)
        .with_area(area)
}

fn projected(code: u32, name: String, datum: Datum, projection: Projection, area: UsageArea) -> CrsSpec {
    CrsSpec::projected(name, datum, projection)
        .with_epsg(code)
        .with_area(area)
}

fn utm(code: u32, zone: u8, north: bool, datum: Datum) -> CrsSpec {
    let cm = f64::from(zone) * 6.0 - 183.0;
    let hemisphere = if north { 'N' } else { 'S' };
    let area = match (north, datum.code) {
        (true, Some(6258)) => UsageArea::named("Europe", cm - 3.0, 32.88, cm + 3.0, 84.73),
        (true, _) => UsageArea::named("Northern hemisphere", cm - 3.0, 0.0, cm + 3.0, 84.0),
        (false, _) => UsageArea::named("Southern hemisphere", cm - 3.0, -80.0, cm + 3.0, 0.0),
    };
    let name = format!("{} / UTM zone {zone}{hemisphere}", datum.name);
    let projection =
        Projection::transverse_mercator(TransverseMercatorParams::utm(zone, north, datum.ellipsoid));
    projected(code, name, datum, projection, area)
}

fn gauss_kruger(code: u32, cm: f64, three_degree: bool) -> CrsSpec {
    let datum = Datum::cgcs2000();
    let params = TransverseMercatorParams {
        ellipsoid: datum.ellipsoid,
        central_meridian: cm,
        scale_factor: 1.0,
        false_easting: 500_000.0,
        false_northing: 0.0,
    };
    let half = if three_degree { 1.5 } else { 3.0 };
    let china = china();
    let area = UsageArea::named("China", cm - half, china.south, cm + half, china.north);
    let name = if three_degree {
        format!("CGCS2000 / 3-degree Gauss-Kruger CM {cm}E")
    } else {
        format!("CGCS2000 / Gauss-Kruger CM {cm}E")
    };
    projected(code, name, datum, Projection::transverse_mercator(params), area)
}

/// 按 EPSG 代码查询结构化参数
///
/// # Errors
///
/// 代码不在目录中时返回 `GeoError::UnsupportedEpsg`。
#[allow(clippy::cast_possible_truncation)]
pub fn lookup(code: u32) -> GeoResult<CrsSpec> {
    let spec = match code {
        4326 => wgs84_geographic(),
        4258 => geographic(4258, Datum::etrs89(), europe()),
        4289 => geographic(4289, Datum::amersfoort(), netherlands()),
        4490 => geographic(4490, Datum::cgcs2000(), china()),
        3857 => projected(
            3857,
            "WGS 84 / Pseudo-Mercator".to_string(),
            Datum::wgs84(),
            Projection::WebMercator(WebMercator),
            UsageArea::named("World between 85.06S and 85.06N", -180.0, -85.06, 180.0, 85.06),
        ),
        32601..=32660 => utm(code, (code - 32600) as u8, true, Datum::wgs84()),
        32701..=32760 => utm(code, (code - 32700) as u8, false, Datum::wgs84()),
        25828..=25838 => utm(code, (code - 25800) as u8, true, Datum::etrs89()),
        28992 => projected(
            28992,
            "Amersfoort / RD New".to_string(),
            Datum::amersfoort(),
            Projection::oblique_stereographic(ObliqueStereographicParams::rd_new()),
            netherlands(),
        ),
        4502..=4512 => gauss_kruger(code, 75.0 + f64::from(code - 4502) * 6.0, false),
        4534..=4554 => gauss_kruger(code, 75.0 + f64::from(code - 4534) * 3.0, true),
        _ => return Err(GeoError::UnsupportedEpsg { code }),
    };
    Ok(spec)
}
