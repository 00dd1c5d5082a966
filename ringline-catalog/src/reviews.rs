/// Rule violations for review create/update/delete.
///
/// Messages are the user-facing Russian strings the API returns verbatim.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ReviewRuleError {
    #[error("Рейтинг должен быть от 1 до 5")]
    InvalidRating,

    #[error("Вы уже оставили отзыв для этого тура")]
    AlreadyReviewed,

    #[error("Недостаточно прав для редактирования этого отзыва")]
    NotOwnerEdit,

    #[error("Недостаточно прав для удаления этого отзыва")]
    NotOwnerDelete,
}

/// Ratings live in [1, 5], checked on both create and update.
pub fn validate_rating(rating: i32) -> Result<(), ReviewRuleError> {
    if (1..=5).contains(&rating) {
        Ok(())
    } else {
        Err(ReviewRuleError::InvalidRating)
    }
}
