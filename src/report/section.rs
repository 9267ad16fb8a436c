//! Section Splitting
//!
//! A `section` groups the table by the column named in its leading `name`
//! directive and renders the remaining children once per category:
//!
//! ```text
//! header(grouping column)          depth
//!   header(category)               depth + 1
//!     nested directives            depth + 2
//! ```
//!
//! A category survives only when its nested rendering holds at least one
//! list item.

use tracing::{debug, warn};

use super::assembler::DocumentAssembler;
use super::fragment::Fragment;
use super::latex;
use crate::constants::latex as markup;
use crate::types::{Directive, Result, Table, section_key};

impl DocumentAssembler<'_> {
    /// Partition `table` by the section's grouping column and render each part
    pub fn split_and_render(
        &mut self,
        table: &Table,
        children: &[Directive],
        depth: usize,
    ) -> Result<Fragment> {
        let Some((key, nested)) = section_key(children) else {
            warn!(
                "Section at depth {} does not start with a name directive",
                depth
            );
            return Ok(Fragment::text(markup::SECTION_ERROR));
        };

        let mut fragment = Fragment::text(latex::header(table.column_name(key.column), depth));

        for (category, rows) in table.partition(key.column) {
            let body = self.render_directives(&rows, nested, depth + 2)?;
            if !body.has_items() {
                debug!("Category '{}' rendered no items, skipping", category);
                continue;
            }
            if key.new_page {
                fragment.push_text(markup::PAGE_BREAK);
            }
            fragment.push_text(latex::header(&category, depth + 1));
            fragment.append(body);
        }

        Ok(fragment)
    }
}

// =============================================================================
// Tests
// =============================================================================
