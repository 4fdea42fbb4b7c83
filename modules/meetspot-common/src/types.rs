use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// --- Geo Types ---

/// Haversine great-circle distance between two lat/lon points in meters.
pub fn haversine_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    const EARTH_RADIUS_M: f64 = 6_371_000.0;
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let lat1_r = lat1.to_radians();
    let lat2_r = lat2.to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1_r.cos() * lat2_r.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();
    EARTH_RADIUS_M * c
}

/// Axis-aligned bounding box, rendered as "south,west,north,east".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl BoundingBox {
    /// Box around a center point covering `radius_meters` in every direction.
    /// Longitude span widens with latitude; clamped near the poles.
    pub fn around(lat: f64, lon: f64, radius_meters: f64) -> Self {
        const METERS_PER_DEG_LAT: f64 = 111_320.0;
        let d_lat = radius_meters / METERS_PER_DEG_LAT;
        let cos_lat = lat.to_radians().cos().max(0.01);
        let d_lon = radius_meters / (METERS_PER_DEG_LAT * cos_lat);
        Self {
            south: lat - d_lat,
            west: lon - d_lon,
            north: lat + d_lat,
            east: lon + d_lon,
        }
    }
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:.6},{:.6},{:.6},{:.6}",
            self.south, self.west, self.north, self.east
        )
    }
}

// --- Enums ---

/// What the user is meeting up for. Derived once per request, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    MarketplaceSale,
    FirstDate,
    NightWalk,
    GeneralMeetup,
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Intent::MarketplaceSale => write!(f, "marketplace_sale"),
            Intent::FirstDate => write!(f, "first_date"),
            Intent::NightWalk => write!(f, "night_walk"),
            Intent::GeneralMeetup => write!(f, "general_meetup"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PlaceKind {
    PoliceStation,
    Cafe,
    ShoppingMall,
    Bank,
    GasStation,
    Grocery,
    Library,
    TransitStation,
    Park,
    /// Synthetic kind for merged community-report hotspots.
    CommunityHotspot,
}

impl std::fmt::Display for PlaceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaceKind::PoliceStation => write!(f, "police_station"),
            PlaceKind::Cafe => write!(f, "cafe"),
            PlaceKind::ShoppingMall => write!(f, "shopping_mall"),
            PlaceKind::Bank => write!(f, "bank"),
            PlaceKind::GasStation => write!(f, "gas_station"),
            PlaceKind::Grocery => write!(f, "grocery"),
            PlaceKind::Library => write!(f, "library"),
            PlaceKind::TransitStation => write!(f, "transit_station"),
            PlaceKind::Park => write!(f, "park"),
            PlaceKind::CommunityHotspot => write!(f, "community_hotspot"),
        }
    }
}

impl PlaceKind {
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "police_station" | "police" => Some(Self::PoliceStation),
            "cafe" | "coffee" => Some(Self::Cafe),
            "shopping_mall" | "mall" => Some(Self::ShoppingMall),
            "bank" => Some(Self::Bank),
            "gas_station" | "gas" | "fuel" => Some(Self::GasStation),
            "grocery" | "supermarket" => Some(Self::Grocery),
            "library" => Some(Self::Library),
            "transit_station" | "transit" | "station" => Some(Self::TransitStation),
            "park" => Some(Self::Park),
            "community_hotspot" | "hotspot" => Some(Self::CommunityHotspot),
            _ => None,
        }
    }

    pub fn all_real() -> &'static [PlaceKind] {
        &[
            PlaceKind::PoliceStation,
            PlaceKind::Cafe,
            PlaceKind::ShoppingMall,
            PlaceKind::Bank,
            PlaceKind::GasStation,
            PlaceKind::Grocery,
            PlaceKind::Library,
            PlaceKind::TransitStation,
            PlaceKind::Park,
        ]
    }
}

// --- Candidate Types ---

/// A physical place that can host a meetup — from the place source, or
/// synthesized from community reports (kind = CommunityHotspot).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceCandidate {
    pub id: String,
    pub kind: PlaceKind,
    pub name: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

/// A raw camera location. Unindexed; the engine buckets these into grid cells.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CameraPoint {
    pub lat: f64,
    pub lon: f64,
}

/// One populated fine-resolution cell of community camera reports.
/// Produced by the report source, read-only to the engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportCellAggregate {
    pub cell_id: String,
    pub yes_count: u32,
    pub no_count: u32,
    pub signage_count: u32,
    pub latest_summary: Option<String>,
    pub latest_signage_text: Option<String>,
    pub reported_place_name: Option<String>,
    pub reported_place_kind: Option<String>,
    pub reported_place_id: Option<String>,
    pub reported_place_source: Option<String>,
    pub reported_place_address: Option<String>,
    pub reported_details: Option<String>,
}

/// A candidate after scoring: the place plus every signal that was attributed
/// to it and the human-readable reasons, in a fixed priority order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredCandidate {
    pub id: String,
    pub kind: PlaceKind,
    pub name: Option<String>,
    pub lat: f64,
    pub lon: f64,
    pub score: f64,
    pub distance_meters: f64,
    pub cell_id: String,
    pub cameras_in_neighborhood: u32,
    pub cameras_in_cell: u32,
    pub report_yes: u32,
    pub report_no: u32,
    pub report_signage: u32,
    /// True iff both yes and no evidence were attributed to this candidate.
    pub conflict: bool,
    pub reasons: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reported_place_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reported_place_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reported_place_source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reported_place_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reported_details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rerank_reason: Option<String>,
}

// --- Engine request/response ---

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendRequest {
    pub text: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub max_results: Option<u32>,
    #[serde(default)]
    pub exclude_kinds: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMeta {
    pub places_fetched: usize,
    pub cameras_fetched: usize,
    pub report_cells_fetched: usize,
    pub hotspots_built: usize,
    pub candidates_scored: usize,
    pub reranked: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub intent: Intent,
    pub intent_label: String,
    pub bbox: String,
    pub results: Vec<ScoredCandidate>,
    pub meta: ResponseMeta,
    pub note: String,
}

/// Per-intent kind weights keyed by PlaceKind, all in [0, 1].
pub type KindWeights = HashMap<PlaceKind, f64>;
