// catalog.rs
use egui::Color32;
use serde::{Deserialize, Serialize};

/// Closed difficulty scale. The display labels are the traditional Chinese
/// grades; matching is always done on the enum, never on the label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty { Low, Medium, High }

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Low, Difficulty::Medium, Difficulty::High];

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Low    => "初级",
            Difficulty::Medium => "中级",
            Difficulty::High   => "高级",
        }
    }

    pub fn badge_color(self) -> Color32 {
        match self {
            Difficulty::Low    => Color32::from_rgb( 60, 160,  60),
            Difficulty::Medium => Color32::from_rgb(200, 160,   0),
            Difficulty::High   => Color32::from_rgb(200,  60,  60),
        }
    }
}

/// One catalog entry. Created once at load time from the embedded list and
/// never mutated afterwards.
#[derive(Clone, Debug, Deserialize)]
pub struct DanceTrack {
    pub id: u32,
    pub title: String,
    pub ethnicity: String,
    pub difficulty: Difficulty,
    pub video_ref: String,
    pub description: String,
    pub duration_seconds: u32,
}

#[derive(Debug, Deserialize)]
struct TrackList { tracks: Vec<DanceTrack> }

/// Search and filter state for the track browser. An empty query and `None`
/// filters match everything.
#[derive(Clone, Debug, Default)]
pub struct TrackFilter {
    pub query: String,
    pub difficulty: Option<Difficulty>,
    pub ethnicity: Option<String>,
}

impl TrackFilter {
    pub fn matches(&self, track: &DanceTrack) -> bool {
        let query = self.query.trim().to_lowercase();
        let text_hit = query.is_empty()
            || track.title.to_lowercase().contains(&query)
            || track.description.to_lowercase().contains(&query)
            || track.ethnicity.to_lowercase().contains(&query);
        let difficulty_hit = self.difficulty.map_or(true, |d| d == track.difficulty);
        let ethnicity_hit = self.ethnicity.as_deref().map_or(true, |e| e == track.ethnicity);
        text_hit && difficulty_hit && ethnicity_hit
    }

    pub fn clear(&mut self) { *self = TrackFilter::default(); }
}

pub struct Catalog { tracks: Vec<DanceTrack> }

impl Catalog {
    pub fn load() -> Self {
        let list: TrackList = crate::json_loader::load("tracks.json")
            .expect("tracks.json missing or malformed");
        Self { tracks: list.tracks }
    }

    pub fn tracks(&self) -> &[DanceTrack] { &self.tracks }

    pub fn get(&self, id: u32) -> Option<&DanceTrack> { self.tracks.iter().find(|t| t.id == id) }

    pub fn filtered(&self, filter: &TrackFilter) -> Vec<&DanceTrack> {
        self.tracks.iter().filter(|t| filter.matches(t)).collect()
    }

    /// Distinct ethnicities, sorted, for the filter dropdown.
    pub fn ethnicities(&self) -> Vec<String> {
        let mut out: Vec<String> = self.tracks.iter().map(|t| t.ethnicity.clone()).collect();
        out.sort();
        out.dedup();
        out
    }
}

pub fn format_duration(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_loads_embedded_tracks() {
        let catalog = Catalog::load();
        assert_eq!(catalog.tracks().len(), 6);
        assert!(catalog.get(1).is_some());
        assert!(catalog.get(99).is_none());
    }

    #[test]
    fn search_guozhuang_matches_exactly_the_tibetan_track() {
        let catalog = Catalog::load();
        let filter = TrackFilter { query: "锅庄".into(), ..Default::default() };
        let hits = catalog.filtered(&filter);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "藏族锅庄舞");
    }

    #[test]
    fn search_is_case_insensitive_and_covers_description_and_ethnicity() {
        let catalog = Catalog::load();
        let by_ethnicity = TrackFilter { query: "蒙古族".into(), ..Default::default() };
        assert_eq!(catalog.filtered(&by_ethnicity).len(), 1);
        let by_description = TrackFilter { query: "群体".into(), ..Default::default() };
        assert_eq!(catalog.filtered(&by_description)[0].id, 6);
    }

    #[test]
    fn difficulty_and_ethnicity_filters_compose() {
        let catalog = Catalog::load();
        let mut filter = TrackFilter { difficulty: Some(Difficulty::High), ..Default::default() };
        assert_eq!(catalog.filtered(&filter).len(), 2);
        filter.ethnicity = Some("傣族".into());
        let hits = catalog.filtered(&filter);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "傣族孔雀舞");
    }

    #[test]
    fn empty_filter_matches_all() {
        let catalog = Catalog::load();
        assert_eq!(catalog.filtered(&TrackFilter::default()).len(), catalog.tracks().len());
    }

    #[test]
    fn ethnicities_are_sorted_and_unique() {
        let list = Catalog::load().ethnicities();
        assert_eq!(list.len(), 6);
        let mut sorted = list.clone();
        sorted.sort();
        assert_eq!(list, sorted);
    }

    #[test]
    fn duration_formatting() {
        assert_eq!(format_duration(180), "3:00");
        assert_eq!(format_duration(95), "1:35");
    }
}
