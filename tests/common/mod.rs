//! Shared test documents for integration tests.

/// A document holding two bibliographies, written the way hand-edited
/// coursework notes are: a preamble, numbered articles, and trailing notes.
///
/// Bibliography 1 has three articles, the second of which has no full-text
/// line. Bibliography 2 has two well-formed articles numbered 6 and 7.
pub const TWO_BIBLIOGRAPHIES: &str = "# Attachment Theory: Annotated Bibliographies

**Prepared for SOWK 6000**

## Bibliography 1: Attachment Theory in Clinical Social Work Practice

This annotated bibliography outlines research evidence.

### Article 1
**Smith, J. (2020). A study of adult attachment. *Clinical Social Work Journal*, 48(2), 100-110.**

The authors review adult attachment styles in clinical settings.
They conclude that secure base behaviour predicts engagement.

Strength: large sample. Weakness: single site.

**Full-text available at:** https://example.com/smith2020.pdf

### Article 2
**Jones, K. (2018). Attachment and trauma.**

An annotation without any link.

### Article 3
**Lee, M. (2021). Mentalization in practice.**

Short annotation.

**Full-text available at:** https://doi.org/10.1000/lee2021

## Bibliography 2: Attachment Theory in Child and Family Social Work

### Article 6
**Brown, A. (2019). Foster care placements.**

Placement stability and attachment.

**Full-text available at:** https://example.org/brown.pdf

### Article 7
**Green, P. (2022). Family reunification.**

Reunification outcomes.

**Full-text available at:** https://example.org/green.pdf

## Notes on Article Selection

**Selection criteria** were peer review and recency.
";

/// Start marker of the first bibliography.
pub const BIB_1: &str = "## Bibliography 1:";
/// Start marker of the second bibliography.
pub const BIB_2: &str = "## Bibliography 2:";
/// Marker that ends the second bibliography.
pub const NOTES: &str = "## Notes on Article Selection";
