//! Employee block segmentation.
//!
//! A payroll statement repeats one block per employee, each introduced by
//! `Funcionário: <registration> - `. Segmentation splits the text on that
//! marker; everything before the first marker is the preamble.

use std::sync::LazyLock;

use regex::Regex;

static EMPLOYEE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Funcion[aá]rio:\s*(\d+)\s*-\s*")
        .unwrap_or_else(|e| panic!("invalid employee marker pattern: {e}"))
});

/// The text belonging to one employee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeBlock {
    /// The registration number from the marker (ASCII digits).
    pub registration_id: String,
    /// The text after the marker up to the next marker or end of text.
    pub text: String,
}

/// A statement split into its preamble and employee blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segmentation {
    /// Text before the first marker (header, period label).
    pub preamble: String,
    /// Blocks in document order.
    pub blocks: Vec<EmployeeBlock>,
}

fn is_registration(id: &str) -> bool {
    id.bytes().all(|b| b.is_ascii_digit())
}

/// Returns true if `text` holds at least one marker that [`segment`] would
/// turn into a block. Stops at the first such marker.
pub fn has_employee_block(text: &str) -> bool {
    EMPLOYEE_MARKER
        .captures_iter(text)
        .any(|caps| caps.get(1).is_some_and(|id| is_registration(id.as_str())))
}

/// Splits `text` into employee blocks.
///
/// Blocks are non-overlapping and in document order. A marker whose
/// registration is not made of ASCII digits yields no block; its text is
/// dropped with it.
///
/// # Example
///
/// ```
/// use payroll_import::extraction::segment;
///
/// let text = "Cabeçalho\nFuncionário: 101 - ANA\nFuncionário: 202 - BRUNO\n";
/// let segmentation = segment(text);
/// assert_eq!(segmentation.preamble, "Cabeçalho\n");
/// assert_eq!(segmentation.blocks.len(), 2);
/// assert_eq!(segmentation.blocks[0].registration_id, "101");
/// assert_eq!(segmentation.blocks[1].text, "BRUNO\n");
/// ```
pub fn segment(text: &str) -> Segmentation {
    let markers: Vec<(usize, usize, &str)> = EMPLOYEE_MARKER
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let id = caps.get(1)?;
            Some((whole.start(), whole.end(), id.as_str()))
        })
        .collect();

    let preamble = match markers.first() {
        Some(&(start, _, _)) => text[..start].to_string(),
        None => text.to_string(),
    };

    let blocks = markers
        .iter()
        .enumerate()
        .filter(|(_, (_, _, id))| is_registration(id))
        .map(|(i, &(_, body_start, id))| {
            let body_end = markers
                .get(i + 1)
                .map(|&(next_start, _, _)| next_start)
                .unwrap_or(text.len());
            EmployeeBlock {
                registration_id: id.to_string(),
                text: text[body_start..body_end].to_string(),
            }
        })
        .collect();

    Segmentation { preamble, blocks }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_two_blocks_in_order() {
        let text = "Funcionário: 101 - A\nFuncionário: 202 - B";
        let segmentation = segment(text);

        assert_eq!(segmentation.preamble, "");
        assert_eq!(
            segmentation.blocks,
            vec![
                EmployeeBlock {
                    registration_id: "101".to_string(),
                    text: "A\n".to_string(),
                },
                EmployeeBlock {
                    registration_id: "202".to_string(),
                    text: "B".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_concatenation_reconstructs_text_minus_markers() {
        let text = "Mês/Ano: 03/2026\nFuncionário: 101 - A Adm: 01/02/2020\nSalário Base: 2.200,00\nFuncionário:202 -B\nfim";
        let segmentation = segment(text);
        let joined: String = segmentation.blocks.iter().map(|b| b.text.as_str()).collect();
        assert_eq!(
            joined,
            "A Adm: 01/02/2020\nSalário Base: 2.200,00\nB\nfim"
        );
        assert_eq!(segmentation.preamble, "Mês/Ano: 03/2026\n");
    }

    #[test]
    fn test_no_marker_means_no_blocks() {
        let segmentation = segment("Cartão de ponto\nEmpregado: 5 - ANA");
        assert!(segmentation.blocks.is_empty());
        assert_eq!(segmentation.preamble, "Cartão de ponto\nEmpregado: 5 - ANA");
    }

    #[test]
    fn test_non_ascii_digit_registration_is_discarded() {
        // Arabic-Indic digits satisfy the Unicode \d class.
        let text = "Funcionário: ١٢ - X\nFuncionário: 7 - Y";
        let segmentation = segment(text);
        assert_eq!(segmentation.blocks.len(), 1);
        assert_eq!(segmentation.blocks[0].registration_id, "7");
        assert_eq!(segmentation.blocks[0].text, "Y");
    }

    #[test]
    fn test_has_employee_block_skips_non_ascii_registration() {
        assert!(!has_employee_block("Funcionário: ١٢ - X"));
        assert!(has_employee_block("Funcionário: ١٢ - X\nFuncionário: 7 - Y"));
        assert!(!has_employee_block("Empregado: 5 - ANA"));
    }

    #[test]
    fn test_marker_without_accent() {
        let segmentation = segment("FUNCIONARIO: 9 - ZE");
        assert_eq!(segmentation.blocks[0].registration_id, "9");
    }

    proptest! {
        #[test]
        fn blocks_reconstruct_text(
            names in proptest::collection::vec("[A-Z][A-Z ]{0,11}\n[a-z0-9 ,.]{0,20}", 1..6),
            ids in proptest::collection::vec(1u32..99999, 6),
        ) {
            let mut text = String::from("Header\n");
            for (name, id) in names.iter().zip(ids.iter()) {
                text.push_str(&format!("Funcionário: {id} - {name}\n"));
            }
            let segmentation = segment(&text);
            prop_assert_eq!(segmentation.blocks.len(), names.len());

            let joined: String = segmentation.blocks.iter().map(|b| b.text.as_str()).collect();
            let expected: String = names.iter().map(|n| format!("{n}\n")).collect();
            prop_assert_eq!(joined, expected);

            prop_assert!(has_employee_block(&text));
            for (block, id) in segmentation.blocks.iter().zip(ids.iter()) {
                prop_assert_eq!(&block.registration_id, &id.to_string());
            }
        }
    }
}
