//! Scoring functions for search operations

/// BM25 parameters
pub const BM25_K1: f32 = 1.2;
pub const BM25_B: f32 = 0.75;

/// Inverse document frequency. Always positive, even for terms present in every document.
pub fn idf(df: u32, total_docs: u32) -> f32 {
    let df = df as f32;
    let n = total_docs as f32;
    ((n - df + 0.5) / (df + 0.5) + 1.0).ln()
}

/// BM25 contribution of one field of one document for a term.
///
/// # Arguments
/// * `tf` - Term frequency in the field
/// * `idf` - Inverse document frequency of the term, see [`idf`]
/// * `field_len` - Length of the field (in tokens)
/// * `avg_field_len` - Average length of the field across all documents
/// * `boost` - Field boost from the index
pub fn bm25_field_score(tf: u32, idf: f32, field_len: u32, avg_field_len: f32, boost: f32) -> f32 {
    let tf = tf as f32;
    let norm = if avg_field_len > 0.0 {
        1.0 - BM25_B + BM25_B * (field_len as f32 / avg_field_len)
    } else {
        1.0
    };
    boost * idf * (tf * (BM25_K1 + 1.0)) / (tf + BM25_K1 * norm)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idf_is_positive_and_decreasing() {
        assert!(idf(10, 10) > 0.0);
        assert!(idf(1, 10) > idf(5, 10));
    }

    #[test]
    fn higher_tf_scores_higher() {
        let w = idf(1, 4);
        assert!(bm25_field_score(3, w, 10, 10.0, 1.0) > bm25_field_score(1, w, 10, 10.0, 1.0));
    }

    #[test]
    fn shorter_field_scores_higher() {
        let w = idf(1, 4);
        assert!(bm25_field_score(1, w, 5, 10.0, 1.0) > bm25_field_score(1, w, 20, 10.0, 1.0));
    }

    #[test]
    fn zero_average_length_does_not_divide_by_zero() {
        let s = bm25_field_score(1, idf(1, 1), 0, 0.0, 2.0);
        assert!(s.is_finite() && s > 0.0);
    }
}
