use crate::anilist::MediaLookup;
use crate::prompt::{select_index, InputProvider};
use crate::seadex::CatalogCheck;
use crate::source::{Derivation, SourceDeriver};
use anyhow::Result;
use std::io::Write;

/// Search, let the user pick a hit, resolve its status and print where to find it.
///
/// Upstream failures are reported on `out`; only console errors are returned.
pub fn run_lookup(
    input: &mut impl InputProvider,
    out: &mut impl Write,
    anilist: &impl MediaLookup,
    catalog: &impl CatalogCheck,
    nyaa_url: &str,
) -> Result<()> {
    let Some(title) = input.read_required("Enter title:")? else {
        return Ok(());
    };

    let results = match anilist.search_anime(&title) {
        Ok(results) => results,
        Err(e) => {
            tracing::warn!(error = %e, %title, "AniList search failed");
            Vec::new()
        }
    };
    if results.is_empty() {
        writeln!(out, "No results found")?;
        return Ok(());
    }

    writeln!(out, "\nSearch results:")?;
    for (i, result) in results.iter().enumerate() {
        writeln!(out, "{}. {}", i + 1, result)?;
        writeln!(out, "---")?;
    }

    let Some(index) = select_index(input, out, results.len())? else {
        return Ok(());
    };
    let selected = &results[index];
    writeln!(
        out,
        "You selected: '{}' (AniList ID: {})",
        selected.title_romaji, selected.id
    )?;

    let info = match anilist.anime_status(selected.id) {
        Ok(info) => info,
        Err(e) => {
            tracing::warn!(error = %e, id = selected.id, "AniList status lookup failed");
            writeln!(out, "Could not retrieve the anime's status.")?;
            return Ok(());
        }
    };
    writeln!(out, "'{}' status: {}.", info.title_romaji, info.status.label())?;

    let deriver = SourceDeriver::new(catalog, nyaa_url);
    match deriver.derive_url(selected.id, &info.status, &selected.title_romaji) {
        Derivation::Url(url) => writeln!(out, "URL generated: {}", url)?,
        Derivation::Unavailable(reason) => {
            writeln!(out, "{}", reason)?;
            writeln!(out, "Could not generate a URL for this anime.")?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anilist::{MediaStatus, SearchResult, StatusInfo};
    use crate::error::{self, LookupError};
    use crate::prompt::LineInput;
    use std::io::{self, Cursor};

    const NYAA: &str = "https://nyaa.land/user/subsplease";

    struct FakeAnilist {
        search: fn() -> error::Result<Vec<SearchResult>>,
        status: fn(u32) -> error::Result<StatusInfo>,
    }

    impl MediaLookup for FakeAnilist {
        fn search_anime(&self, _title: &str) -> error::Result<Vec<SearchResult>> {
            (self.search)()
        }

        fn anime_status(&self, id: u32) -> error::Result<StatusInfo> {
            (self.status)(id)
        }
    }

    struct NoCatalog;

    impl CatalogCheck for NoCatalog {
        fn has_entry(&self, _anilist_id: u32) -> error::Result<bool> {
            Ok(false)
        }

        fn entry_url(&self, anilist_id: u32) -> String {
            format!("https://releases.moe/{}", anilist_id)
        }
    }

    fn unavailable() -> LookupError {
        LookupError::Api {
            status_code: 500,
            message: "Internal Server Error".into(),
        }
    }

    fn two_hits() -> error::Result<Vec<SearchResult>> {
        Ok(vec![
            SearchResult {
                id: 21,
                title_romaji: "ONE PIECE".into(),
                title_english: Some("ONE PIECE".into()),
            },
            SearchResult {
                id: 154587,
                title_romaji: "Sousou no Frieren".into(),
                title_english: Some("Frieren: Beyond Journey's End".into()),
            },
        ])
    }

    fn status_of(id: u32, status: MediaStatus) -> error::Result<StatusInfo> {
        Ok(StatusInfo {
            id,
            title_romaji: "Sousou no Frieren".into(),
            title_english: None,
            status,
        })
    }

    fn run(answers: &str, anilist: &FakeAnilist) -> String {
        let mut input = LineInput::new(Cursor::new(answers.to_string()), io::sink());
        let mut out = Vec::new();
        run_lookup(&mut input, &mut out, anilist, &NoCatalog, NYAA).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn failed_search_reports_no_results() {
        let anilist = FakeAnilist {
            search: || Err(unavailable()),
            status: |_| panic!("status must not be fetched"),
        };
        assert_eq!(run("Frieren\n", &anilist), "No results found\n");
    }

    #[test]
    fn empty_search_reports_no_results() {
        let anilist = FakeAnilist {
            search: || Ok(Vec::new()),
            status: |_| panic!("status must not be fetched"),
        };
        assert_eq!(run("Frieren\n", &anilist), "No results found\n");
    }

    #[test]
    fn failed_status_is_reported() {
        let anilist = FakeAnilist {
            search: two_hits,
            status: |_| Err(unavailable()),
        };
        let out = run("Frieren\n2\n", &anilist);
        assert!(out.contains("You selected: 'Sousou no Frieren' (AniList ID: 154587)\n"));
        assert!(out.ends_with("Could not retrieve the anime's status.\n"));
    }

    #[test]
    fn unreleased_show_explains_missing_url() {
        let anilist = FakeAnilist {
            search: two_hits,
            status: |id| status_of(id, MediaStatus::NotYetReleased),
        };
        let out = run("Frieren\n2\n", &anilist);
        assert!(out.ends_with(
            "'Sousou no Frieren' status: Not Yet Released.\n\
             The show 'Sousou no Frieren' has not been released yet.\n\
             Could not generate a URL for this anime.\n"
        ));
    }

    #[test]
    fn finished_show_prints_full_transcript() {
        let anilist = FakeAnilist {
            search: two_hits,
            status: |id| status_of(id, MediaStatus::Finished),
        };
        let out = run("Frieren\nx\n9\n2\n", &anilist);
        assert_eq!(
            out,
            "\nSearch results:\n\
             1. AniList ID: 21\n   Title (Romaji): ONE PIECE\n   Title (English): ONE PIECE\n---\n\
             2. AniList ID: 154587\n   Title (Romaji): Sousou no Frieren\n   Title (English): Frieren: Beyond Journey's End\n---\n\
             Invalid selection. Please enter a number.\n\
             Invalid selection.\n\
             You selected: 'Sousou no Frieren' (AniList ID: 154587)\n\
             'Sousou no Frieren' status: Finished Airing.\n\
             URL generated: https://nyaa.land/user/subsplease?f=0&c=1_2&q=Sousou+no+Frieren+1080p+batch&o=desc&p=1\n"
        );
    }

    #[test]
    fn input_ending_before_selection_stops_quietly() {
        let anilist = FakeAnilist {
            search: two_hits,
            status: |_| panic!("status must not be fetched"),
        };
        let out = run("Frieren\n", &anilist);
        assert!(out.ends_with("---\n"));
        assert_eq!(run("", &anilist), "");
    }
}
