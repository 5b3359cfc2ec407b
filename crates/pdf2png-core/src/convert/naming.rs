//! Output file naming.

const PDF_EXTENSION: &str = ".pdf";
const PNG_EXTENSION: &str = ".png";

/// Whether `name` ends with `.pdf`, ignoring ASCII case.
pub fn is_pdf_file_name(name: &str) -> bool {
    name.len() >= PDF_EXTENSION.len()
        && name.as_bytes()[name.len() - PDF_EXTENSION.len()..]
            .eq_ignore_ascii_case(PDF_EXTENSION.as_bytes())
}

/// Replace a trailing `.pdf` (any case) with `.png`.
pub fn png_file_name(pdf_name: &str) -> String {
    let stem = if is_pdf_file_name(pdf_name) {
        // The suffix is ASCII, so this is a char boundary.
        &pdf_name[..pdf_name.len() - PDF_EXTENSION.len()]
    } else {
        pdf_name
    };
    format!("{stem}{PNG_EXTENSION}")
}
