//! Enumerations shared between scripts and the host.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Tiling scheme a source uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum MapSpaceType {
    /// Spherical (Web) Mercator, used by almost every web map.
    #[default]
    MercatorSpherical,
    /// Ellipsoidal Mercator (WGS84 ellipsoid), used by a few national servers.
    MercatorEllipsoidal,
}

impl MapSpaceType {
    /// All variants with the names scripts use for them.
    pub const SCRIPT_NAMES: [(&'static str, MapSpaceType); 2] = [
        ("msMercatorSpherical", MapSpaceType::MercatorSpherical),
        ("msMercatorEllipsoidal", MapSpaceType::MercatorEllipsoidal),
    ];

    /// Name scripts use for this variant.
    pub fn script_name(&self) -> &'static str {
        match self {
            MapSpaceType::MercatorSpherical => "msMercatorSpherical",
            MapSpaceType::MercatorEllipsoidal => "msMercatorEllipsoidal",
        }
    }
}

impl FromStr for MapSpaceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::SCRIPT_NAMES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(s.trim()))
            .map(|(_, value)| *value)
            .ok_or_else(|| format!("unknown map space type '{}'", s))
    }
}

impl fmt::Display for MapSpaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.script_name())
    }
}

/// How a tile store should check whether a cached tile is still current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum TileUpdate {
    /// Cached tiles never expire.
    #[default]
    None,
    /// Conditional request with `If-None-Match`.
    IfNoneMatch,
    /// Compare the server's `ETag` with the stored one.
    ETag,
    /// Conditional request with `If-Modified-Since`.
    IfModifiedSince,
    /// Compare the server's `Last-Modified` with the stored one.
    LastModified,
}

impl TileUpdate {
    /// All variants with the names scripts use for them.
    pub const SCRIPT_NAMES: [(&'static str, TileUpdate); 5] = [
        ("None", TileUpdate::None),
        ("IfNoneMatch", TileUpdate::IfNoneMatch),
        ("ETag", TileUpdate::ETag),
        ("IfModifiedSince", TileUpdate::IfModifiedSince),
        ("LastModified", TileUpdate::LastModified),
    ];

    /// Name scripts use for this variant.
    pub fn script_name(&self) -> &'static str {
        match self {
            TileUpdate::None => "None",
            TileUpdate::IfNoneMatch => "IfNoneMatch",
            TileUpdate::ETag => "ETag",
            TileUpdate::IfModifiedSince => "IfModifiedSince",
            TileUpdate::LastModified => "LastModified",
        }
    }
}

impl FromStr for TileUpdate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::SCRIPT_NAMES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(s.trim()))
            .map(|(_, value)| *value)
            .ok_or_else(|| format!("unknown tile update policy '{}'", s))
    }
}

impl fmt::Display for TileUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.script_name())
    }
}

/// Image format of the tiles a source serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TileImageType {
    Png,
    Jpg,
    Gif,
}

impl TileImageType {
    /// Resolves a registered tile type name (`png`, `jpg`/`jpeg`, `gif`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "png" => Some(TileImageType::Png),
            "jpg" | "jpeg" => Some(TileImageType::Jpg),
            "gif" => Some(TileImageType::Gif),
            _ => None,
        }
    }

    /// Usual file extension.
    pub fn extension(&self) -> &'static str {
        match self {
            TileImageType::Png => "png",
            TileImageType::Jpg => "jpg",
            TileImageType::Gif => "gif",
        }
    }

    /// MIME type servers report for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            TileImageType::Png => "image/png",
            TileImageType::Jpg => "image/jpeg",
            TileImageType::Gif => "image/gif",
        }
    }
}

impl fmt::Display for TileImageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Where tile data may come from for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadMethod {
    /// Cache first, then the network.
    #[default]
    Default,
    /// Only a tile cache; never the network.
    Cache,
    /// Always the network.
    Source,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_space_from_script_name() {
        assert_eq!(
            "msMercatorSpherical".parse::<MapSpaceType>().unwrap(),
            MapSpaceType::MercatorSpherical
        );
        assert_eq!(
            "MSMERCATORELLIPSOIDAL".parse::<MapSpaceType>().unwrap(),
            MapSpaceType::MercatorEllipsoidal
        );
        assert!("utm".parse::<MapSpaceType>().is_err());
    }

    #[test]
    fn test_tile_update_names_round_trip() {
        for (name, value) in TileUpdate::SCRIPT_NAMES {
            assert_eq!(value.script_name(), name);
            assert_eq!(name.parse::<TileUpdate>().unwrap(), value);
        }
        assert!("Sometimes".parse::<TileUpdate>().is_err());
    }

    #[test]
    fn test_tile_image_type_names() {
        assert_eq!(TileImageType::from_name("PNG"), Some(TileImageType::Png));
        assert_eq!(TileImageType::from_name("jpeg"), Some(TileImageType::Jpg));
        assert_eq!(TileImageType::from_name("jpg"), Some(TileImageType::Jpg));
        assert_eq!(TileImageType::from_name(" gif "), Some(TileImageType::Gif));
        assert_eq!(TileImageType::from_name("webp"), None);
        assert_eq!(TileImageType::Jpg.mime_type(), "image/jpeg");
    }

    #[test]
    fn test_defaults() {
        assert_eq!(MapSpaceType::default(), MapSpaceType::MercatorSpherical);
        assert_eq!(TileUpdate::default(), TileUpdate::None);
        assert_eq!(LoadMethod::default(), LoadMethod::Default);
    }
}
