pub use rentc_derive::Checkboxes;

const MARKED: &str = "[x]";
const BLANK: &str = "[ ]";

/// A closed set of mutually exclusive options rendered as one checkbox row.
pub trait Checkboxes: PartialEq + Sized + 'static {
    /// Every option, in display order.
    fn options() -> &'static [Self];

    fn label(&self) -> &'static str;

    /// Trailing labels that are printed but never marked.
    fn unmarked_labels() -> &'static [&'static str] {
        &[]
    }
}

/// Render `[x] Selected [ ] Other ...` with exactly one option marked.
pub fn checkbox_row<T: Checkboxes>(selected: &T) -> String {
    let marked = T::options()
        .iter()
        .map(|option| (option == selected, option.label()));
    let unmarked = T::unmarked_labels().iter().map(|label| (false, *label));

    marked
        .chain(unmarked)
        .map(|(is_selected, label)| {
            let marker = if is_selected { MARKED } else { BLANK };
            format!("{} {}", marker, label)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Checkboxes)]
    #[checkbox(unmarked = "Maybe")]
    enum Answer {
        Yes,
        #[checkbox(label = "Absolutely not")]
        No,
    }

    #[test]
    fn derive_keeps_declaration_order() {
        assert_eq!(Answer::options(), &[Answer::Yes, Answer::No]);
    }

    #[test]
    fn derive_uses_label_or_variant_name() {
        assert_eq!(Answer::Yes.label(), "Yes");
        assert_eq!(Answer::No.label(), "Absolutely not");
        assert_eq!(Answer::unmarked_labels(), &["Maybe"]);
    }

    #[test]
    fn row_marks_selected_only() {
        assert_eq!(
            checkbox_row(&Answer::No),
            "[ ] Yes [x] Absolutely not [ ] Maybe"
        );
        assert_eq!(
            checkbox_row(&Answer::Yes),
            "[x] Yes [ ] Absolutely not [ ] Maybe"
        );
    }
}
