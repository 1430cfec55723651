//! CSV template offered to users preparing an import file.

use std::path::Path;

use tracing::info;

use super::LoaderError;

/// Header plus two example rows.
pub const TEMPLATE_CSV: &str = "id_requerente;titulo;descricao;id_categoria;urgencia;tipo
12;Problema com impressora;A impressora não está respondendo;15;3;1
8;Computador lento;O computador está muito lento;12;2;1";

/// Write [`TEMPLATE_CSV`] to `path` as UTF-8, replacing any existing file.
pub fn export_template(path: &Path) -> Result<(), LoaderError> {
    std::fs::write(path, TEMPLATE_CSV).map_err(|source| LoaderError::Io {
        path: path.display().to_string(),
        source,
    })?;
    info!("CSV template written to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{load, load_file};
    use tempfile::TempDir;

    #[test]
    fn test_template_loads_cleanly() {
        let report = load(TEMPLATE_CSV).unwrap();
        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.rejected_count(), 0);
        assert_eq!(report.rows[0].title, "Problema com impressora");
        assert_eq!(report.rows[1].urgency(), 2);
    }

    #[test]
    fn test_export_template_round_trips_through_loader() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("modelo.csv");

        export_template(&path).unwrap();
        let report = load_file(&path).unwrap();

        assert_eq!(report.rows.len(), 2);
        assert!(report.rejected.is_empty());
    }

    #[test]
    fn test_export_template_unwritable_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing-dir").join("modelo.csv");

        let err = export_template(&path).unwrap_err();
        assert!(matches!(err, LoaderError::Io { .. }));
    }
}
