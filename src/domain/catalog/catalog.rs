//! Question catalog value type.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

/// Category names used when no catalog source is available.
pub const FALLBACK_CATEGORIES: &[&str] = &[
    "Marriage And Relationship",
    "Responsible Parenthood",
    "Planning The Family",
    "Maternal Neonatal Child Health And Nutrition",
];

/// Separator between the instrument prefix and the category name in full titles.
const CATEGORY_TITLE_SEPARATOR: &str = " ON ";

/// 1-indexed identifier of a catalog category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(u32);

impl CategoryId {
    /// Creates a category id. Ids start at 1.
    pub fn new(id: u32) -> Result<Self, ValidationError> {
        if id == 0 {
            return Err(ValidationError::out_of_range(
                "category_id",
                1,
                i64::from(u32::MAX),
                0,
            ));
        }
        Ok(Self(id))
    }

    /// Returns the raw id.
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Zero-based position of this category in the catalog.
    ///
    /// An id that does not fit in `usize` points past every catalog.
    pub fn index(&self) -> usize {
        usize::try_from(self.0 - 1).unwrap_or(usize::MAX)
    }

    /// Id of the category at a zero-based position.
    pub fn from_index(index: usize) -> Result<Self, ValidationError> {
        u32::try_from(index)
            .ok()
            .and_then(|i| i.checked_add(1))
            .map(Self)
            .ok_or_else(|| {
                ValidationError::out_of_range(
                    "category_index",
                    0,
                    i64::from(u32::MAX - 1),
                    i64::try_from(index).unwrap_or(i64::MAX),
                )
            })
    }

    /// Ids `1..` paired with `items`.
    fn numbered<T>(items: impl IntoIterator<Item = T>) -> impl Iterator<Item = (Self, T)> {
        (1u32..).map(Self).zip(items)
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A question as stored by the catalog source.
///
/// Questions with sub-questions are answered per sub-question; standalone
/// questions are answered once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogQuestion {
    pub text: String,
    #[serde(default)]
    pub sub_questions: Vec<String>,
}

impl CatalogQuestion {
    /// Number of answers this question contributes to the questionnaire.
    pub fn answerable_count(&self) -> usize {
        self.sub_questions.len().max(1)
    }
}

/// A category and its questions, in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSection {
    /// Full category title, e.g. "MARRIAGE EXPECTATIONS AND INVENTORY ON PLANNING THE FAMILY".
    pub name: String,
    #[serde(default)]
    pub questions: Vec<CatalogQuestion>,
}

/// Read-only snapshot of category names and the question → category mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    categories: Vec<String>,
    /// Entry `i` holds the category of question ordinal `i + 1`.
    question_categories: Vec<CategoryId>,
}

impl Catalog {
    /// Creates a catalog from category names and per-question category ids.
    ///
    /// # Errors
    ///
    /// - No categories or no questions
    /// - A question mapped to a category id outside `1..=categories.len()`
    pub fn new(
        categories: Vec<String>,
        question_categories: Vec<CategoryId>,
    ) -> Result<Self, ValidationError> {
        if categories.is_empty() {
            return Err(ValidationError::empty_field("categories"));
        }
        if question_categories.is_empty() {
            return Err(ValidationError::empty_field("questions"));
        }
        if let Some(bad) = question_categories
            .iter()
            .find(|id| id.index() >= categories.len())
        {
            return Err(ValidationError::out_of_range(
                "category_id",
                1,
                i64::try_from(categories.len()).unwrap_or(i64::MAX),
                i64::from(bad.value()),
            ));
        }

        Ok(Self {
            categories,
            question_categories,
        })
    }

    /// Builds a catalog from category sections in source order.
    ///
    /// Category ids are assigned by position. Answerable ordinals run
    /// across sections: every sub-question gets its own ordinal, and a
    /// question without sub-questions gets one.
    pub fn from_sections(sections: &[CatalogSection]) -> Result<Self, ValidationError> {
        let categories = sections
            .iter()
            .map(|s| short_category_name(&s.name))
            .collect();

        let mut question_categories = Vec::new();
        for (index, section) in sections.iter().enumerate() {
            let id = CategoryId::from_index(index)?;
            let answers: usize = section
                .questions
                .iter()
                .map(CatalogQuestion::answerable_count)
                .sum();
            question_categories.extend(std::iter::repeat(id).take(answers));
        }

        Self::new(categories, question_categories)
    }

    /// The built-in four-category catalog with one question per category.
    pub fn fallback() -> Self {
        Self {
            categories: FALLBACK_CATEGORIES.iter().map(|c| c.to_string()).collect(),
            question_categories: CategoryId::numbered(FALLBACK_CATEGORIES)
                .map(|(id, _)| id)
                .collect(),
        }
    }

    /// Category display names, in category id order.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    /// Total number of answerable questions.
    pub fn question_count(&self) -> usize {
        self.question_categories.len()
    }

    /// All category ids in order.
    pub fn category_ids(&self) -> impl Iterator<Item = CategoryId> + '_ {
        CategoryId::numbered(&self.categories).map(|(id, _)| id)
    }

    /// Display name of a category.
    pub fn category_name(&self, id: CategoryId) -> Option<&str> {
        self.categories.get(id.index()).map(String::as_str)
    }

    /// Category of a 1-indexed question ordinal.
    pub fn category_of(&self, ordinal: usize) -> Option<CategoryId> {
        ordinal
            .checked_sub(1)
            .and_then(|i| self.question_categories.get(i))
            .copied()
    }

    /// 1-indexed ordinals of the questions mapped to a category.
    pub fn question_ordinals(&self, id: CategoryId) -> Vec<usize> {
        self.question_categories
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == id)
            .map(|(i, _)| i + 1)
            .collect()
    }
}

/// Shortens a full category title to its display name.
///
/// "MARRIAGE EXPECTATIONS AND INVENTORY ON PLANNING THE FAMILY" becomes
/// "Planning The Family". Titles without the separator are title-cased whole.
pub fn short_category_name(full_name: &str) -> String {
    let name = match full_name.split_once(CATEGORY_TITLE_SEPARATOR) {
        Some((_, rest)) => rest.trim(),
        None => full_name.trim(),
    };
    title_case(name)
}

fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_is_letter = false;
    for c in s.chars() {
        if prev_is_letter {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        prev_is_letter = c.is_alphabetic();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(text: &str, subs: &[&str]) -> CatalogQuestion {
        CatalogQuestion {
            text: text.to_string(),
            sub_questions: subs.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn id(n: u32) -> CategoryId {
        CategoryId::new(n).unwrap()
    }

    #[test]
    fn category_id_rejects_zero() {
        assert!(CategoryId::new(0).is_err());
        assert_eq!(id(3).index(), 2);
    }

    #[test]
    fn from_index_is_one_based_and_checked() {
        assert_eq!(CategoryId::from_index(0), Ok(id(1)));
        assert_eq!(CategoryId::from_index(3).map(|c| c.index()), Ok(3));
        assert!(matches!(
            CategoryId::from_index(u32::MAX as usize),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn category_ids_follow_catalog_order() {
        let catalog = Catalog::fallback();
        let ids: Vec<u32> = catalog.category_ids().map(|c| c.value()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(catalog.category_name(id(5)), None);
    }

    #[test]
    fn fallback_has_four_categories_one_question_each() {
        let catalog = Catalog::fallback();
        assert_eq!(catalog.category_count(), 4);
        assert_eq!(catalog.question_count(), 4);
        assert_eq!(catalog.category_of(1), Some(id(1)));
        assert_eq!(catalog.category_of(4), Some(id(4)));
        assert_eq!(catalog.category_name(id(2)), Some("Responsible Parenthood"));
    }

    #[test]
    fn new_rejects_empty_categories() {
        let result = Catalog::new(vec![], vec![id(1)]);
        assert!(matches!(result, Err(ValidationError::EmptyField { .. })));
    }

    #[test]
    fn new_rejects_empty_questions() {
        let result = Catalog::new(vec!["A".into()], vec![]);
        assert!(matches!(result, Err(ValidationError::EmptyField { .. })));
    }

    #[test]
    fn new_rejects_unknown_category() {
        let result = Catalog::new(vec!["A".into()], vec![id(1), id(2)]);
        assert!(matches!(result, Err(ValidationError::OutOfRange { .. })));
    }

    #[test]
    fn from_sections_counts_sub_questions_instead_of_parent() {
        let sections = vec![
            CatalogSection {
                name: "MARRIAGE EXPECTATIONS AND INVENTORY ON MARRIAGE AND RELATIONSHIP".into(),
                questions: vec![question("Q1", &["a", "b", "c"]), question("Q2", &[])],
            },
            CatalogSection {
                name: "MARRIAGE EXPECTATIONS AND INVENTORY ON PLANNING THE FAMILY".into(),
                questions: vec![question("Q3", &["a", "b"])],
            },
        ];

        let catalog = Catalog::from_sections(&sections).unwrap();

        assert_eq!(catalog.question_count(), 6);
        assert_eq!(catalog.question_ordinals(id(1)), vec![1, 2, 3, 4]);
        assert_eq!(catalog.question_ordinals(id(2)), vec![5, 6]);
        assert_eq!(
            catalog.categories(),
            &["Marriage And Relationship".to_string(), "Planning The Family".to_string()]
        );
    }

    #[test]
    fn category_of_out_of_range_is_none() {
        let catalog = Catalog::fallback();
        assert_eq!(catalog.category_of(0), None);
        assert_eq!(catalog.category_of(5), None);
    }

    #[test]
    fn short_name_strips_instrument_prefix() {
        assert_eq!(
            short_category_name("MARRIAGE EXPECTATIONS AND INVENTORY ON RESPONSIBLE PARENTHOOD"),
            "Responsible Parenthood"
        );
    }

    #[test]
    fn short_name_without_separator_is_title_cased() {
        assert_eq!(short_category_name("FAMILY FINANCES"), "Family Finances");
    }

    #[test]
    fn title_case_handles_punctuation() {
        assert_eq!(title_case("MOTHER-CHILD CARE"), "Mother-Child Care");
    }
}
