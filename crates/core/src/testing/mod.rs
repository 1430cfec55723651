//! Testing utilities and mock implementations.
//!
//! `MockTicketingApi` stands in for a GLPI server so batch and session logic
//! can be exercised without network access.
//!
//! # Example
//!
//! ```rust,ignore
//! use glpi_batch_core::testing::{fixtures, MockTicketingApi};
//!
//! let api = MockTicketingApi::new();
//! api.push_error(TicketingError::Timeout).await;
//!
//! let result = submit(&api, &session, &fixtures::rows(3), &cancel, |_| {}).await?;
//! assert_eq!(result.failure_count, 1);
//! ```

mod mock_ticketing;

pub use mock_ticketing::MockTicketingApi;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::loader::TicketRequestRow;

    /// CSV header row in the import format.
    pub const CSV_HEADER: &str = "id_requerente;titulo;descricao;id_categoria;urgencia;tipo";

    /// Create a valid row with reasonable defaults.
    pub fn row(requester_id: i64, title: &str) -> TicketRequestRow {
        TicketRequestRow {
            requester_id,
            title: title.to_string(),
            description: format!("Description of {}", title.to_lowercase()),
            category_id: 15,
            raw_urgency: Some("3".to_string()),
            raw_type: Some("1".to_string()),
        }
    }

    /// Create `count` valid rows titled "Ticket 1" .. "Ticket n".
    pub fn rows(count: usize) -> Vec<TicketRequestRow> {
        (1..=count)
            .map(|i| row(i as i64, &format!("Ticket {}", i)))
            .collect()
    }

    /// Build CSV text from data lines, prefixed by [`CSV_HEADER`].
    pub fn csv(lines: &[&str]) -> String {
        std::iter::once(CSV_HEADER)
            .chain(lines.iter().copied())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
