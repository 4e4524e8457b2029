//! Keyword-based genre guessing.

/// Label used when no rule matches.
pub const DEFAULT_GENRE: &str = "Music";

/// Ordered rules: the first group with a keyword found in the title or
/// description decides the genre. Order matters where groups overlap.
const GENRE_RULES: &[(&[&str], &str)] = &[
    (&["أغنية", "أغاني", "موسيقى", "مهرجان", "شعبي"], "Arabic Pop"),
    (&["راب", "rap", "hip hop"], "Arabic Rap"),
    (&["كلاسيكي", "طرب", "أم كلثوم", "فيروز"], "Arabic Classical"),
    (&["مهرجان", "شعبي"], "Mahraganat"),
    (&["pop", "بوب"], "Pop"),
    (&["rock", "روك"], "Rock"),
    (&["jazz", "جاز"], "Jazz"),
    (&["classical", "كلاسيكي"], "Classical"),
];

/// Guess a genre label from a title and description.
pub fn classify(title: &str, description: &str) -> &'static str {
    let title = title.to_lowercase();
    let description = description.to_lowercase();

    GENRE_RULES
        .iter()
        .find(|(keywords, _)| {
            keywords
                .iter()
                .any(|k| title.contains(k) || description.contains(k))
        })
        .map(|(_, genre)| *genre)
        .unwrap_or(DEFAULT_GENRE)
}
