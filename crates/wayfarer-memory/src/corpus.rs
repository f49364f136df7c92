//! Built-in travel planning documents and on-disk document loading.

use crate::knowledge::Document;
use crate::Result;
use std::path::Path;
use tracing::debug;

const GENERAL_PLANNING_GUIDE: &str = "\
How to plan a personalized 2-day trip:
1. Identify the user's main interests (e.g., food, anime, history, nature).
2. Use web_search to find the top 3-5 specific locations in the target city
   that match those interests.
3. Group locations geographically. Dedicate Day 1 to one area (e.g., downtown,
   north side) and Day 2 to another to minimize travel time.
4. Use get_weather to check the forecast. If Day 1 is rainy, plan indoor
   activities (museums, indoor markets) for that day.
5. Use web_search to suggest accommodation near one of the key areas.
";

const ANIME_TRAVEL_TIPS: &str = "\
Travel Tips for Anime Lovers:
When a user asks for an 'anime' trip to a new city:
1. Use web_search for terms like \"anime district [City Name]\",
   \"manga cafe [City Name]\", or \"video game museum [City Name]\".
2. If the city is outside Japan, famous spots might be specific stores
   like \"Manga Story\" in Paris or \"Kinokuniya\" in various cities.
3. Check for any special events or anime conventions happening during the
   user's travel dates using web_search.
";

const FOODIE_TRAVEL_TIPS: &str = "\
Travel Tips for Foodies:
When a user asks for a 'food' trip:
1. Use web_search for \"traditional food market [City Name]\" or
   \"famous local dish [City Name]\".
2. Suggest a mix of experiences: one high-end restaurant, one famous street
   food stall, and one local market.
3. Use web_search for \"best restaurants near [Landmark Name]\" to combine
   sightseeing with good food.
";

/// The generic planning guide plus the anime and foodie tip sheets.
pub fn builtin_documents() -> Vec<Document> {
    vec![
        Document::new(GENERAL_PLANNING_GUIDE, "general_planning_guide.txt"),
        Document::new(ANIME_TRAVEL_TIPS, "anime_travel_tips.txt"),
        Document::new(FOODIE_TRAVEL_TIPS, "foodie_travel_tips.txt"),
    ]
}

/// Read every `.txt` and `.md` file directly under `dir`, sorted by file
/// name. The file name becomes the document's source label.
pub fn load_documents_dir(dir: &Path) -> Result<Vec<Document>> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_text = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("txt") || ext.eq_ignore_ascii_case("md"));
        if path.is_file() && is_text {
            paths.push(path);
        }
    }
    paths.sort();

    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        let content = std::fs::read_to_string(&path)?;
        let source = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        debug!(source = %source, chars = content.chars().count(), "Loaded document");
        documents.push(Document::new(content, source));
    }

    Ok(documents)
}
