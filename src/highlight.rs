//! Highlight annotations written with lopdf
//!
//! Each call adds one `/Highlight` annotation covering a set of word boxes
//! and links it from the page's `/Annots` array. Annotations carry their own
//! appearance stream so viewers that do not synthesize one still draw them.

use crate::config::Color;
use crate::matcher::MatchSpan;
use crate::words::BBox;
use crate::HighlightError;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

/// Constant opacity of highlight annotations
const HIGHLIGHT_OPACITY: f32 = 1.0;

/// How matched boxes are grouped into annotations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Grouping {
    /// One annotation per phrase per page, covering every occurrence
    #[default]
    PerPhrase,
    /// One annotation per phrase occurrence
    PerOccurrence,
}

impl Grouping {
    /// Split a page's matches into the box groups passed to [`add_highlight`]
    pub fn group(&self, spans: Vec<MatchSpan>) -> Vec<Vec<BBox>> {
        if spans.is_empty() {
            return Vec::new();
        }
        match self {
            Grouping::PerPhrase => vec![spans.into_iter().flat_map(|s| s.boxes).collect()],
            Grouping::PerOccurrence => spans.into_iter().map(|s| s.boxes).collect(),
        }
    }
}

/// QuadPoints for a box: top-left, top-right, bottom-left, bottom-right
fn quad_points(bbox: &BBox) -> [f32; 8] {
    [
        bbox.x0, bbox.y1, bbox.x1, bbox.y1, bbox.x0, bbox.y0, bbox.x1, bbox.y0,
    ]
}

fn reals<I: IntoIterator<Item = f32>>(values: I) -> Object {
    Object::Array(values.into_iter().map(Object::Real).collect())
}

/// Form XObject that fills every box with the color, multiplied over the page
fn appearance_stream(rect: &BBox, boxes: &[BBox], color: Color) -> Result<Stream, HighlightError> {
    let mut operations = vec![
        Operation::new("gs", vec![Object::Name(b"H0".to_vec())]),
        Operation::new("rg", vec![color.r.into(), color.g.into(), color.b.into()]),
    ];
    for b in boxes {
        operations.push(Operation::new(
            "re",
            vec![b.x0.into(), b.y0.into(), b.width().into(), b.height().into()],
        ));
    }
    operations.push(Operation::new("f", vec![]));
    let content = Content { operations }.encode()?;

    // BBox matches the annotation Rect, so page coordinates draw unchanged
    Ok(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Form",
            "FormType" => 1,
            "BBox" => reals([rect.x0, rect.y0, rect.x1, rect.y1]),
            "Resources" => dictionary! {
                "ExtGState" => dictionary! {
                    "H0" => dictionary! {
                        "Type" => "ExtGState",
                        "BM" => "Multiply",
                        "CA" => Object::Real(HIGHLIGHT_OPACITY),
                        "ca" => Object::Real(HIGHLIGHT_OPACITY),
                    },
                },
            },
        },
        content,
    ))
}

/// Add a highlight annotation over `boxes` to a page.
///
/// Returns the id of the new annotation object. Fails if `boxes` is empty
/// or the page is not a dictionary.
pub fn add_highlight(
    doc: &mut Document,
    page_id: ObjectId,
    boxes: &[BBox],
    color: Color,
) -> Result<ObjectId, HighlightError> {
    let Some(first) = boxes.first() else {
        return Err(HighlightError::InvalidStructure(
            "highlight needs at least one box".to_string(),
        ));
    };
    let rect = boxes.iter().fold(*first, |acc, b| acc.union(b));
    let appearance_id = doc.add_object(appearance_stream(&rect, boxes, color)?);

    let annot = dictionary! {
        "Type" => "Annot",
        "Subtype" => "Highlight",
        "Rect" => reals([rect.x0, rect.y0, rect.x1, rect.y1]),
        "QuadPoints" => reals(boxes.iter().flat_map(quad_points)),
        "C" => reals([color.r, color.g, color.b]),
        "CA" => Object::Real(HIGHLIGHT_OPACITY),
        "AP" => dictionary! {
            "N" => Object::Reference(appearance_id),
        },
        // Printable
        "F" => 4,
        "P" => Object::Reference(page_id),
    };
    let annot_id = doc.add_object(annot);

    attach_to_page(doc, page_id, annot_id)?;
    Ok(annot_id)
}

/// Append an annotation reference to the page's `/Annots`, which may be a
/// direct array, a reference to an array, or missing.
fn attach_to_page(
    doc: &mut Document,
    page_id: ObjectId,
    annot_id: ObjectId,
) -> Result<(), HighlightError> {
    let annot_ref = Object::Reference(annot_id);

    let annots_ref = {
        let page = doc
            .get_object(page_id)?
            .as_dict()
            .map_err(|_| HighlightError::InvalidStructure(format!("page {:?} is not a dictionary", page_id)))?;
        match page.get(b"Annots") {
            Ok(Object::Reference(id)) => Some(*id),
            _ => None,
        }
    };

    if let Some(array_id) = annots_ref {
        if let Ok(Object::Array(array)) = doc.get_object_mut(array_id) {
            array.push(annot_ref);
            return Ok(());
        }
    }

    let page = doc.get_object_mut(page_id)?.as_dict_mut()?;
    match page.get_mut(b"Annots") {
        Ok(Object::Array(array)) => array.push(annot_ref),
        _ => page.set("Annots", Object::Array(vec![annot_ref])),
    }
    Ok(())
}
