use crate::contest::{ProblemInfo, solution_filename};
use crate::scrape::ScrapedProblem;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const EXTRA_PROBLEMS_FILE: &str = "extraProblems.json";
const DIV_TO_PROBS_FILE: &str = "div_to_probs.json";
const ID_TO_SOL_FILE: &str = "id_to_sol.json";

/// Locations of the three data files, relative to the site checkout root.
#[derive(Debug, Clone)]
pub struct DataPaths {
    pub extra_problems: PathBuf,
    pub div_to_probs: PathBuf,
    pub id_to_sol: PathBuf,
}

impl Default for DataPaths {
    fn default() -> Self {
        let division_list = Path::new("src/components/markdown/ProblemsList/DivisionList");
        Self {
            extra_problems: PathBuf::from("content").join(EXTRA_PROBLEMS_FILE),
            div_to_probs: division_list.join(DIV_TO_PROBS_FILE),
            id_to_sol: division_list.join(ID_TO_SOL_FILE),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{path:?} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("{document} should hold {expected} at {key:?}")]
    Shape {
        document: &'static str,
        key: String,
        expected: &'static str,
    },
    #[error("JSON serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to stage {path:?}: {source}")]
    Stage {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to replace {path:?}: {source}")]
    Commit {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// The three JSON documents the site renders problem lists from.
/// Held as raw `Value`s so that fields this tool never writes, like curated
/// tags on older records, survive a rewrite untouched.
#[derive(Debug, Clone)]
pub struct SiteData {
    pub extra_problems: Value,
    pub div_to_probs: Value,
    pub id_to_sol: Value,
}

impl SiteData {
    /// Reads and parses all three documents. Nothing is mutated on failure.
    pub fn load(paths: &DataPaths) -> Result<Self, StoreError> {
        Ok(Self {
            extra_problems: load_json(&paths.extra_problems)?,
            div_to_probs: load_json(&paths.div_to_probs)?,
            id_to_sol: load_json(&paths.id_to_sol)?,
        })
    }

    /// Records one scraped problem, returning the updated documents:
    /// the record goes at the end of `EXTRA_PROBLEMS`, a
    /// `[cpid, "year month", title]` triple at the end of the division's
    /// list, and the editorial filename under `cpid` (overwriting any
    /// previous entry). List appends are not deduplicated.
    pub fn add_problem(mut self, cpid: &str, scraped: &ScrapedProblem) -> Result<Self, StoreError> {
        let record = ProblemInfo::new(cpid, &scraped.title, scraped.division);
        tracing::info!("New entry: {:?}", record);

        self.extra_problems
            .get_mut("EXTRA_PROBLEMS")
            .and_then(Value::as_array_mut)
            .ok_or_else(|| shape(EXTRA_PROBLEMS_FILE, "EXTRA_PROBLEMS", "an array"))?
            .push(serde_json::to_value(&record)?);

        let division = scraped.division.as_str();
        let triple = Value::Array(vec![
            Value::String(cpid.to_string()),
            Value::String(format!("{} {}", scraped.year, scraped.month)),
            Value::String(scraped.title.clone()),
        ]);
        self.div_to_probs
            .get_mut(division)
            .and_then(Value::as_array_mut)
            .ok_or_else(|| shape(DIV_TO_PROBS_FILE, division, "an array"))?
            .push(triple);

        let filename =
            solution_filename(scraped.number, scraped.division, scraped.month, scraped.year);
        self.id_to_sol
            .as_object_mut()
            .ok_or_else(|| shape(ID_TO_SOL_FILE, "", "an object"))?
            .insert(cpid.to_string(), Value::String(filename));

        Ok(self)
    }

    /// Writes all three documents back. Every document is serialized and
    /// staged as a `.tmp` sibling before any original is replaced, so a
    /// failure up to that point leaves the files on disk untouched.
    pub fn commit(&self, paths: &DataPaths) -> Result<(), StoreError> {
        let staged: [(&Path, Vec<u8>); 3] = [
            (
                paths.extra_problems.as_path(),
                to_tabbed_json(&self.extra_problems)?,
            ),
            (
                paths.div_to_probs.as_path(),
                to_tabbed_json(&self.div_to_probs)?,
            ),
            (paths.id_to_sol.as_path(), to_tabbed_json(&self.id_to_sol)?),
        ];

        for (i, (path, text)) in staged.iter().enumerate() {
            if let Err(source) = fs::write(staging_path(path), text) {
                for (done, _) in &staged[..=i] {
                    let _ = fs::remove_file(staging_path(done));
                }
                return Err(StoreError::Stage {
                    path: path.to_path_buf(),
                    source,
                });
            }
        }
        for (path, _) in &staged {
            fs::rename(staging_path(path), path).map_err(|source| StoreError::Commit {
                path: path.to_path_buf(),
                source,
            })?;
        }
        Ok(())
    }
}

fn shape(document: &'static str, key: &str, expected: &'static str) -> StoreError {
    StoreError::Shape {
        document,
        key: key.to_string(),
        expected,
    }
}

fn load_json(path: &Path) -> Result<Value, StoreError> {
    let text = fs::read_to_string(path).map_err(|source| StoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Tab-indented pretty JSON with a trailing newline, matching the formatting
/// of the checked-in data files.
fn to_tabbed_json(value: &Value) -> Result<Vec<u8>, serde_json::Error> {
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    buf.push(b'\n');
    Ok(buf)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::contest::{ContestMonth, Division};

    fn sample_problem() -> ScrapedProblem {
        ScrapedProblem {
            number: 3,
            title: "Minimum Longest Trip".to_string(),
            year: 2023,
            month: ContestMonth::December,
            division: Division::Gold,
        }
    }

    fn seed_files(dir: &Path) -> DataPaths {
        fs::create_dir_all(dir).unwrap();
        let paths = DataPaths {
            extra_problems: dir.join(EXTRA_PROBLEMS_FILE),
            div_to_probs: dir.join(DIV_TO_PROBS_FILE),
            id_to_sol: dir.join(ID_TO_SOL_FILE),
        };
        fs::write(
            &paths.extra_problems,
            r#"{"EXTRA_PROBLEMS":[{"uniqueId":"usaco-999","tags":["DP"],"isStarred":true}]}"#,
        )
        .unwrap();
        fs::write(
            &paths.div_to_probs,
            r#"{"Bronze":[],"Silver":[],"Gold":[["1234","2020 January","Word Processor"]],"Platinum":[]}"#,
        )
        .unwrap();
        fs::write(&paths.id_to_sol, r#"{"1234":"sol_prob1_gold_jan20.html"}"#).unwrap();
        paths
    }

    fn read_json(path: &Path) -> Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn test_add_and_commit() {
        let dir = Path::new("temp_dir_add_and_commit");
        let paths = seed_files(dir);

        let data = SiteData::load(&paths).unwrap();
        let data = data.add_problem("1333", &sample_problem()).unwrap();
        data.commit(&paths).unwrap();

        let extra = read_json(&paths.extra_problems);
        let list = extra["EXTRA_PROBLEMS"].as_array().unwrap();
        assert_eq!(list.len(), 2);
        // the pre-existing record survives with its curated fields
        assert_eq!(list[0]["tags"], serde_json::json!(["DP"]));
        assert_eq!(list[0]["isStarred"], true);
        assert_eq!(list[1]["uniqueId"], "usaco-1333");
        assert_eq!(list[1]["name"], "Minimum Longest Trip");

        let divs = read_json(&paths.div_to_probs);
        let gold = divs["Gold"].as_array().unwrap();
        assert_eq!(gold.len(), 2);
        assert_eq!(
            gold[1],
            serde_json::json!(["1333", "2023 December", "Minimum Longest Trip"])
        );
        assert_eq!(divs["Bronze"].as_array().unwrap().len(), 0);

        let sols = read_json(&paths.id_to_sol);
        assert_eq!(sols["1234"], "sol_prob1_gold_jan20.html");
        assert_eq!(sols["1333"], "sol_prob3_gold_dec23.html");

        // tab-indented, trailing newline, no leftover staging files
        let text = fs::read_to_string(&paths.extra_problems).unwrap();
        assert!(text.starts_with("{\n\t\"EXTRA_PROBLEMS\""));
        assert!(text.ends_with('\n'));
        assert!(!staging_path(&paths.extra_problems).exists());

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_duplicate_append() {
        let dir = Path::new("temp_dir_duplicate_append");
        let paths = seed_files(dir);

        let data = SiteData::load(&paths)
            .unwrap()
            .add_problem("1333", &sample_problem())
            .unwrap()
            .add_problem("1333", &sample_problem())
            .unwrap();

        // lists get duplicate entries; the filename map key is overwritten
        assert_eq!(data.extra_problems["EXTRA_PROBLEMS"].as_array().unwrap().len(), 3);
        assert_eq!(data.div_to_probs["Gold"].as_array().unwrap().len(), 3);
        assert_eq!(data.id_to_sol.as_object().unwrap().len(), 2);

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_shape_error_before_commit_leaves_files_alone() {
        let dir = Path::new("temp_dir_shape_error");
        let paths = seed_files(dir);
        fs::write(&paths.div_to_probs, r#"{"Bronze":[]}"#).unwrap();
        let before = fs::read_to_string(&paths.div_to_probs).unwrap();

        let result = SiteData::load(&paths)
            .unwrap()
            .add_problem("1333", &sample_problem());
        assert!(matches!(result, Err(StoreError::Shape { key, .. }) if key == "Gold"));
        assert_eq!(fs::read_to_string(&paths.div_to_probs).unwrap(), before);

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_load_reports_the_failing_file() {
        let dir = Path::new("temp_dir_load_error");
        let paths = seed_files(dir);
        fs::write(&paths.id_to_sol, "{not json").unwrap();

        match SiteData::load(&paths) {
            Err(StoreError::Parse { path, .. }) => assert_eq!(path, paths.id_to_sol),
            other => panic!("unexpected result: {:?}", other),
        }

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_commit_stages_into_missing_directory_fails_cleanly() {
        let dir = Path::new("temp_dir_stage_failure");
        let paths = seed_files(dir);
        let data = SiteData::load(&paths).unwrap();

        // a destination whose directory doesn't exist fails at the staging
        // step, and the writable files gain no leftover .tmp siblings
        let bad_paths = DataPaths {
            id_to_sol: dir.join("missing_subdir").join(ID_TO_SOL_FILE),
            ..paths.clone()
        };
        let result = data.commit(&bad_paths);
        assert!(matches!(result, Err(StoreError::Stage { .. })));
        assert!(!staging_path(&paths.extra_problems).exists());
        assert!(!staging_path(&paths.div_to_probs).exists());

        fs::remove_dir_all(dir).unwrap();
    }
}
