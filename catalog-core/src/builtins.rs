//! Builtin catalog types and the default URL rule table
//!
//! The table order matters and mirrors the catalog's historical startup
//! sequence:
//!
//! 1. file extensions (deterministic)
//! 2. OGC and ArcGIS REST path patterns (speculative)
//! 3. unconditional fallbacks, most common service kind first (speculative)

use crate::error::Result;
use crate::rules::RuleSet;

/// Type identifiers of the builtin catalog member kinds
///
/// Only some of these are targets of the default rule table. The rest are
/// reachable by explicit creation or through configured rules.
pub mod types {
    pub const GROUP: &str = "group";
    pub const STUB: &str = "stub";
    pub const COMPOSITE: &str = "composite";
    pub const URL_REFERENCE: &str = "url-reference";
    pub const SPLIT_REFERENCE: &str = "split-reference";

    // Files
    pub const CSV: &str = "csv";
    pub const CZML: &str = "czml";
    pub const GEOJSON: &str = "geojson";
    pub const KML: &str = "kml";
    pub const GPX: &str = "gpx";
    pub const GEORSS: &str = "georss";
    pub const SHAPEFILE: &str = "shp";
    pub const GLTF: &str = "gltf";
    pub const GTFS: &str = "gtfs";
    pub const CESIUM_3D_TILES: &str = "3d-tiles";

    // OGC services
    pub const WMS: &str = "wms";
    pub const WMS_GROUP: &str = "wms-group";
    pub const WFS: &str = "wfs";
    pub const WFS_GROUP: &str = "wfs-group";
    pub const WMTS: &str = "wmts";
    pub const WMTS_GROUP: &str = "wmts-group";
    pub const WPS: &str = "wps";
    pub const WPS_GROUP: &str = "wps-getCapabilities";
    pub const WPS_RESULT: &str = "wps-result";
    pub const SOS: &str = "sos";
    pub const CSW_GROUP: &str = "csw-group";

    // ArcGIS
    pub const ESRI_GROUP: &str = "esri-group";
    pub const ESRI_MAP_SERVER: &str = "esri-mapServer";
    pub const ESRI_MAP_SERVER_GROUP: &str = "esri-mapServer-group";
    pub const ESRI_FEATURE_SERVER: &str = "esri-featureServer";
    pub const ESRI_FEATURE_SERVER_GROUP: &str = "esri-featureServer-group";
    pub const ARCGIS_PORTAL_GROUP: &str = "arcgis-portal-group";
    pub const ARCGIS_PORTAL_ITEM: &str = "arcgis-portal-item";
    pub const ARCGIS_TERRAIN: &str = "arcgis-terrain";

    // Base maps and terrain
    pub const BING_MAPS: &str = "bing-maps";
    pub const CESIUM_TERRAIN: &str = "cesium-terrain";
    pub const ION_IMAGERY: &str = "ion-imagery";
    pub const OPEN_STREET_MAP: &str = "open-street-map";
    pub const MAPBOX_VECTOR_TILE: &str = "mvt";
    pub const MAPBOX_MAP: &str = "mapbox-map";
    pub const MAPBOX_STYLE: &str = "mapbox-style";
    pub const CARTO: &str = "carto";

    // Data portals
    pub const MAGDA: &str = "magda";
    pub const CKAN_GROUP: &str = "ckan-group";
    pub const CKAN_ITEM: &str = "ckan-item";
    pub const THREDDS_GROUP: &str = "thredds-group";
    pub const SDMX_GROUP: &str = "sdmx-group";
    pub const SDMX_ITEM: &str = "sdmx-json";
    pub const OPENDATASOFT_GROUP: &str = "opendatasoft-group";
    pub const OPENDATASOFT_ITEM: &str = "opendatasoft-item";
    pub const SOCRATA_GROUP: &str = "socrata-group";
    pub const SOCRATA_MAP_VIEW: &str = "socrata-map-item";
    pub const SENAPS_LOCATIONS: &str = "senaps-locations";
    pub const API_TABLE: &str = "api-table";

    // Functions
    pub const YDYR: &str = "ydyr";
    pub const YDYR_JOB: &str = "ydyr-job";

    /// Every builtin type identifier, in catalog registration order
    pub const ALL: &[&str] = &[
        GROUP,
        STUB,
        WMS,
        WMS_GROUP,
        WFS,
        WFS_GROUP,
        WMTS_GROUP,
        WMTS,
        GLTF,
        GEOJSON,
        GPX,
        GEORSS,
        CSV,
        CZML,
        SHAPEFILE,
        ESRI_GROUP,
        ESRI_MAP_SERVER,
        ESRI_MAP_SERVER_GROUP,
        ESRI_FEATURE_SERVER,
        ESRI_FEATURE_SERVER_GROUP,
        ARCGIS_PORTAL_GROUP,
        ARCGIS_PORTAL_ITEM,
        ARCGIS_TERRAIN,
        CESIUM_3D_TILES,
        GTFS,
        BING_MAPS,
        CESIUM_TERRAIN,
        ION_IMAGERY,
        OPEN_STREET_MAP,
        MAGDA,
        KML,
        MAPBOX_VECTOR_TILE,
        CARTO,
        URL_REFERENCE,
        SPLIT_REFERENCE,
        YDYR,
        YDYR_JOB,
        SDMX_GROUP,
        SDMX_ITEM,
        SENAPS_LOCATIONS,
        WPS,
        WPS_GROUP,
        SOS,
        WPS_RESULT,
        COMPOSITE,
        CKAN_GROUP,
        CKAN_ITEM,
        THREDDS_GROUP,
        CSW_GROUP,
        API_TABLE,
        OPENDATASOFT_GROUP,
        OPENDATASOFT_ITEM,
        SOCRATA_GROUP,
        SOCRATA_MAP_VIEW,
        MAPBOX_MAP,
        MAPBOX_STYLE,
    ];
}

use types::*;

/// `(extension, type)` pairs
const EXTENSION_RULES: &[(&str, &str)] = &[
    ("csv", CSV),
    ("czm", CZML),
    ("czml", CZML),
    ("geojson", GEOJSON),
    ("json", GEOJSON),
    ("kml", KML),
    ("gpx", GPX),
    ("kmz", KML),
    ("topojson", GEOJSON),
    ("georss", GEORSS),
    // zipped shapefiles are converted to geojson by the shapefile type
    ("zip", SHAPEFILE),
];

/// `(pattern, type)` pairs; item rules precede their group rules
const PATTERN_RULES: &[(&str, &str)] = &[
    (r"/wms|=wms", WMS_GROUP),
    (r"/wfs|=wfs", WFS_GROUP),
    (r"/wmts|=wmts", WMTS_GROUP),
    (r"/arcgis/rest/.*/MapServer/\d+\b", ESRI_MAP_SERVER),
    (r"/arcgis/rest/.*/MapServer(/.*)?$", ESRI_MAP_SERVER_GROUP),
    (r"/arcgis/rest/.*/FeatureServer/\d+\b", ESRI_FEATURE_SERVER),
    (r"/arcgis/rest/.*/FeatureServer(/.*)?$", ESRI_FEATURE_SERVER_GROUP),
    (r"/arcgis/rest/.*/\d+\b", ESRI_MAP_SERVER),
    (r"/arcgis/rest/", ESRI_GROUP),
    (r"/rest/.*/MapServer/\d+\b", ESRI_MAP_SERVER),
    (r"/rest/.*/MapServer(/.*)?$", ESRI_MAP_SERVER_GROUP),
    (r"/rest/.*/FeatureServer/\d+\b", ESRI_FEATURE_SERVER),
    (r"/rest/.*/FeatureServer(/.*)?$", ESRI_FEATURE_SERVER_GROUP),
    (r"/rest/.*/\d+\b", ESRI_MAP_SERVER),
];

/// Catch-all types, tried in this order when nothing more specific loads
const FALLBACK_TYPES: &[&str] = &[
    WMS_GROUP,
    WFS_GROUP,
    ESRI_MAP_SERVER,
    ESRI_MAP_SERVER_GROUP,
    ESRI_FEATURE_SERVER,
    ESRI_GROUP,
    ESRI_FEATURE_SERVER_GROUP,
];

/// Append the builtin extension and pattern rules, without catch-alls
pub fn register_specific_rules(rules: &mut RuleSet) -> Result<()> {
    for (ext, type_id) in EXTENSION_RULES {
        rules.register_extension(ext, *type_id);
    }
    for (pattern, type_id) in PATTERN_RULES {
        rules.register_pattern(pattern, *type_id)?;
    }
    Ok(())
}

/// Append the builtin catch-all rules
pub fn register_fallback_rules(rules: &mut RuleSet) {
    for type_id in FALLBACK_TYPES {
        rules.register_fallback(*type_id);
    }
}

/// Append the whole builtin table in its canonical order
pub fn register_default_rules(rules: &mut RuleSet) -> Result<()> {
    register_specific_rules(rules)?;
    register_fallback_rules(rules);
    Ok(())
}

/// A fresh rule set holding the builtin table
pub fn default_rules() -> Result<RuleSet> {
    let mut rules = RuleSet::new();
    register_default_rules(&mut rules)?;
    Ok(rules)
}

/// Every type the builtin table can produce, each once
pub fn rule_types() -> Vec<&'static str> {
    let mut all: Vec<&'static str> = Vec::new();
    let targets = EXTENSION_RULES
        .iter()
        .map(|(_, t)| *t)
        .chain(PATTERN_RULES.iter().map(|(_, t)| *t))
        .chain(FALLBACK_TYPES.iter().copied());
    for type_id in targets {
        if !all.contains(&type_id) {
            all.push(type_id);
        }
    }
    all
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::ResolutionPlan;
    use crate::rules::Tier;

    fn plan(url: &str) -> ResolutionPlan {
        ResolutionPlan::build(&default_rules().unwrap(), url)
    }

    #[test]
    fn test_default_table_size_and_order() {
        let rules = default_rules().unwrap();
        assert_eq!(
            rules.len(),
            EXTENSION_RULES.len() + PATTERN_RULES.len() + FALLBACK_TYPES.len()
        );

        // Catch-alls close the table
        let tail = &rules.rules()[rules.len() - FALLBACK_TYPES.len()..];
        assert!(tail.iter().all(|r| r.speculative && r.predicate.is_catch_all()));
    }

    #[test]
    fn test_extensions_route_deterministically() {
        for (url, expected) in [
            ("https://example.com/data.json", GEOJSON),
            ("https://example.com/data.geojson", GEOJSON),
            ("https://example.com/data.topojson", GEOJSON),
            ("https://example.com/doc.kmz", KML),
            ("https://example.com/shapes.zip", SHAPEFILE),
            ("https://example.com/orbit.czm", CZML),
            ("https://example.com/feed.GEORSS?limit=5", GEORSS),
        ] {
            let plan = plan(url);
            assert_eq!(plan.tier, Some(Tier::Deterministic), "{url}");
            assert_eq!(plan.type_ids(), vec![expected], "{url}");
        }
    }

    #[test]
    fn test_arcgis_map_server_plan() {
        let plan = plan("https://example.com/arcgis/rest/services/Foo/MapServer");

        assert_eq!(plan.tier, Some(Tier::Speculative));
        assert_eq!(
            plan.type_ids(),
            vec![
                ESRI_MAP_SERVER_GROUP,
                ESRI_GROUP,
                WMS_GROUP,
                WFS_GROUP,
                ESRI_MAP_SERVER,
                ESRI_FEATURE_SERVER,
                ESRI_FEATURE_SERVER_GROUP,
            ]
        );
    }

    #[test]
    fn test_arcgis_layer_prefers_item() {
        let plan = plan("https://example.com/arcgis/rest/services/Foo/FeatureServer/3");
        assert_eq!(plan.type_ids()[0], ESRI_FEATURE_SERVER);
        assert_eq!(plan.type_ids()[1], ESRI_FEATURE_SERVER_GROUP);
    }

    #[test]
    fn test_wms_query_parameter() {
        let plan = plan("https://example.com/ows?service=WMS&request=GetCapabilities");
        assert_eq!(plan.type_ids()[0], WMS_GROUP);
    }

    #[test]
    fn test_unknown_url_falls_back_to_catch_alls() {
        let plan = plan("https://example.com/something");
        assert_eq!(plan.type_ids(), FALLBACK_TYPES.to_vec());
    }

    #[test]
    fn test_all_types_are_unique_and_cover_rules() {
        let mut seen = std::collections::HashSet::new();
        for type_id in ALL {
            assert!(seen.insert(*type_id), "{type_id} listed twice");
        }
        assert_eq!(ALL.len(), 56);
        assert!(rule_types().iter().all(|t| ALL.contains(t)));
        assert!(!rule_types().contains(&CESIUM_3D_TILES));
    }

    #[test]
    fn test_rule_types_are_unique() {
        let types = rule_types();
        assert_eq!(types.len(), 15);
        assert_eq!(types[0], CSV);
    }
}
