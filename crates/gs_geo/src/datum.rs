// crates/gs_geo/src/datum.rs

//! 大地基准
//!
//! `Datum` 由 EPSG 基准代码（可选）、名称、椭球体以及可选的到 WGS 84 的
//! Helmert 参数（PROJ 字符串中的 `+towgs84`）组成。
//! 两个基准“相同”的判定：都有代码时比较代码，否则比较名称、椭球参数与 `to_wgs84`。

use crate::ellipsoid::Ellipsoid;
use crate::operation::helmert::Helmert;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 大地基准
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Datum {
    /// EPSG 基准代码
    pub code: Option<u32>,
    /// 名称
    pub name: String,
    /// 椭球体
    pub ellipsoid: Ellipsoid,
    /// 到 WGS 84 的内嵌变换参数
    #[serde(default)]
    pub to_wgs84: Option<Helmert>,
}

impl Datum {
    /// EPSG:6326 World Geodetic System 1984
    #[must_use]
    pub fn wgs84() -> Self {
        Self::epsg(6326, "WGS 84", Ellipsoid::WGS84)
    }

    /// EPSG:6258 European Terrestrial Reference System 1989
    #[must_use]
    pub fn etrs89() -> Self {
        Self::epsg(6258, "ETRS89", Ellipsoid::GRS80)
    }

    /// EPSG:6289 Amersfoort
    #[must_use]
    pub fn amersfoort() -> Self {
        Self::epsg(6289, "Amersfoort", Ellipsoid::BESSEL_1841)
    }

    /// EPSG:1043 China 2000
    #[must_use]
    pub fn cgcs2000() -> Self {
        Self::epsg(1043, "China 2000", Ellipsoid::CGCS2000)
    }

    /// 自定义基准（无 EPSG 代码）
    #[must_use]
    pub fn custom(name: impl Into<String>, ellipsoid: Ellipsoid) -> Self {
        Self {
            code: None,
            name: name.into(),
            ellipsoid,
            to_wgs84: None,
        }
    }

    /// 附加到 WGS 84 的 Helmert 参数
    #[must_use]
    pub fn with_to_wgs84(mut self, helmert: Helmert) -> Self {
        self.to_wgs84 = Some(helmert);
        self
    }

    /// 是否为 WGS 84
    #[must_use]
    pub fn is_wgs84(&self) -> bool {
        self.code == Some(6326)
    }

    fn epsg(code: u32, name: &str, ellipsoid: Ellipsoid) -> Self {
        Self {
            code: Some(code),
            name: name.to_string(),
            ellipsoid,
            to_wgs84: None,
        }
    }

    /// 是否指同一基准
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        match (self.code, other.code) {
            (Some(a), Some(b)) => a == b,
            _ => {
                self.name == other.name
                    && self.ellipsoid.approx_eq(&other.ellipsoid)
                    && self.to_wgs84 == other.to_wgs84
            }
        }
    }
}

impl fmt::Display for Datum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_as_by_code() {
        assert!(Datum::wgs84().same_as(&Datum::wgs84()));
        assert!(!Datum::wgs84().same_as(&Datum::etrs89()));
    }

    #[test]
    fn test_same_as_custom() {
        let a = Datum::custom("Local", Ellipsoid::INTERNATIONAL_1924);
        let b = Datum::custom("Local", Ellipsoid::INTERNATIONAL_1924);
        let c = Datum::custom("Local", Ellipsoid::KRASSOVSKY);
        assert!(a.same_as(&b));
        assert!(!a.same_as(&c));

        let shifted = b.clone().with_to_wgs84(Helmert::translation(-87.0, -98.0, -121.0));
        assert!(!a.same_as(&shifted));
    }
}
