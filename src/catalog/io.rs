//! CSV reading and writing of the raw and enriched catalogs.
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Writer};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info};

use super::record::{
    Catalog, DERIVED_COLUMNS, EMOTIONS_COLUMN, EnrichedCatalog, GENRES_COLUMN, IndexedMovie,
    MovieRecord, OVERVIEW_COLUMN, TAGLINE_COLUMN, TITLE_COLUMN,
};
use crate::emotion::{EMOTION_LIST_FORMAT, format_emotion_list, parse_emotion_list};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to open catalog {}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("catalog has no `{0}` column")]
    MissingColumn(&'static str),
    #[error("malformed catalog: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to write catalog {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn column(headers: &StringRecord, name: &'static str) -> Option<usize> {
    headers.iter().position(|header| header.trim() == name)
}

fn required_column(headers: &StringRecord, name: &'static str) -> Result<usize, CatalogError> {
    column(headers, name).ok_or(CatalogError::MissingColumn(name))
}

fn field(record: &StringRecord, index: Option<usize>) -> String {
    index
        .and_then(|index| record.get(index))
        .unwrap_or_default()
        .to_string()
}

/// Reads a raw catalog. `title` and `genres` are required; missing `overview`
/// or `tagline` columns read as blank text.
pub fn read_catalog<R: io::Read>(reader: R) -> Result<Catalog, CatalogError> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = reader.headers()?.clone();

    let title = required_column(&headers, TITLE_COLUMN)?;
    let genres = required_column(&headers, GENRES_COLUMN)?;
    let overview = column(&headers, OVERVIEW_COLUMN);
    let tagline = column(&headers, TAGLINE_COLUMN);

    let passthrough: Vec<usize> = headers
        .iter()
        .enumerate()
        .filter(|(_, name)| !DERIVED_COLUMNS.iter().any(|derived| *derived == name.trim()))
        .map(|(index, _)| index)
        .collect();
    let columns = passthrough
        .iter()
        .map(|&index| headers[index].to_string())
        .collect();

    let mut movies = Vec::new();
    for record in reader.records() {
        let record = record?;
        let values = passthrough
            .iter()
            .map(|&index| field(&record, Some(index)))
            .collect();
        movies.push(MovieRecord::from_parts(
            field(&record, Some(title)),
            field(&record, Some(genres)),
            field(&record, overview),
            field(&record, tagline),
            values,
        ));
    }

    Ok(Catalog::with_columns(columns, movies))
}

pub fn load_catalog(path: &Path) -> Result<Catalog, CatalogError> {
    let file = File::open(path).map_err(|source| CatalogError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let catalog = read_catalog(file)?;
    info!(path = %path.display(), rows = catalog.len(), "loaded raw catalog");
    Ok(catalog)
}

/// Writes the enriched catalog: pass-through columns, then the derived ones.
pub fn write_enriched<W: io::Write>(writer: W, catalog: &EnrichedCatalog) -> Result<(), CatalogError> {
    let mut writer = Writer::from_writer(writer);

    let header = catalog
        .columns
        .iter()
        .map(String::as_str)
        .chain(DERIVED_COLUMNS);
    writer.write_record(header)?;

    for enriched in &catalog.movies {
        let derived = [
            format_emotion_list(&enriched.genres),
            format_emotion_list(&enriched.breakdown.from_genres),
            format_emotion_list(&enriched.breakdown.from_overview),
            format_emotion_list(&enriched.breakdown.from_tagline),
            format_emotion_list(&enriched.emotions),
            EMOTION_LIST_FORMAT.to_string(),
        ];
        let row = enriched
            .movie
            .values()
            .iter()
            .map(String::as_str)
            .chain(derived.iter().map(String::as_str));
        writer.write_record(row)?;
    }

    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Persists the enriched catalog at `path`, replacing any previous file. The
/// data goes to a temporary sibling first, so readers never observe a
/// partially written catalog.
pub fn save_enriched(path: &Path, catalog: &EnrichedCatalog) -> Result<(), CatalogError> {
    let write_error = |source| CatalogError::Write {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staging = NamedTempFile::new_in(dir).map_err(write_error)?;
    write_enriched(&mut staging, catalog)?;
    staging.as_file().sync_all().map_err(write_error)?;
    staging
        .persist(path)
        .map_err(|error| write_error(error.error))?;

    info!(
        path = %path.display(),
        rows = catalog.movies.len(),
        format = EMOTION_LIST_FORMAT,
        "saved enriched catalog"
    );
    Ok(())
}

/// Reads `(title, emotion set)` pairs from an enriched catalog. Malformed
/// emotion fields read as empty sets.
pub fn read_index_source<R: io::Read>(reader: R) -> Result<Vec<IndexedMovie>, CatalogError> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = reader.headers()?.clone();
    let title = required_column(&headers, TITLE_COLUMN)?;
    let emotions = required_column(&headers, EMOTIONS_COLUMN)?;

    let mut movies = Vec::new();
    for record in reader.records() {
        let record = record?;
        movies.push(IndexedMovie {
            title: field(&record, Some(title)),
            emotions: parse_emotion_list(record.get(emotions).unwrap_or_default()),
        });
    }
    debug!(rows = movies.len(), "read index source");
    Ok(movies)
}

pub fn load_index_source(path: &Path) -> Result<Vec<IndexedMovie>, CatalogError> {
    let file = File::open(path).map_err(|source| CatalogError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let movies = read_index_source(file)?;
    info!(path = %path.display(), rows = movies.len(), "loaded enriched catalog");
    Ok(movies)
}
