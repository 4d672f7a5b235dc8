//! Slide part reading.
//!
//! Extracts the direct `<p:sp>` children of the shape tree with their text,
//! frame geometry, and first-run properties, following the event-walking
//! style of the package reader: one streaming pass, local-name matching.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::common::{Error, Result};

/// Shape position and size in EMUs, from `<a:off>` and `<a:ext>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeGeometry {
    /// X position in EMUs
    pub x: i64,
    /// Y position in EMUs
    pub y: i64,
    /// Width in EMUs
    pub cx: i64,
    /// Height in EMUs
    pub cy: i64,
}

/// Character properties captured from a shape's first text run.
///
/// Carried over into the rewritten run so the template's typeface and
/// attributes (bold, language, ...) survive the text replacement.
#[derive(Debug, Clone, Default)]
pub struct RunProps {
    /// `<a:rPr>` attributes as (key, value) pairs, `sz` excluded
    pub attrs: Vec<(String, String)>,
    /// Font size from the `sz` attribute, in centipoints
    pub size_centi: Option<u32>,
    /// Typeface from `<a:latin>`
    pub typeface: Option<String>,
}

/// One direct `<p:sp>` child of the slide's `<p:spTree>`.
#[derive(Debug, Clone)]
pub struct SlideShape {
    /// Ordinal among the direct `<p:sp>` children; edits are addressed by it
    pub index: usize,
    /// Concatenated run text, paragraphs joined with newlines
    pub text: String,
    /// Frame geometry, when the shape carries its own `<a:xfrm>`
    pub geometry: Option<ShapeGeometry>,
    /// First run's character properties, when present
    pub run_props: Option<RunProps>,
}

struct ShapeBuilder {
    index: usize,
    text: String,
    off: Option<(i64, i64)>,
    ext: Option<(i64, i64)>,
    run_props: Option<RunProps>,
}

impl ShapeBuilder {
    fn new(index: usize) -> Self {
        Self {
            index,
            text: String::new(),
            off: None,
            ext: None,
            run_props: None,
        }
    }

    fn finish(self) -> SlideShape {
        let geometry = match (self.off, self.ext) {
            (Some((x, y)), Some((cx, cy))) => Some(ShapeGeometry { x, y, cx, cy }),
            _ => None,
        };
        SlideShape {
            index: self.index,
            text: self.text,
            geometry,
            run_props: self.run_props,
        }
    }
}

/// Read the text shapes of a slide part.
pub fn text_shapes(xml: &[u8]) -> Result<Vec<SlideShape>> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Vec<u8>> = Vec::new();
    let mut shapes = Vec::new();
    let mut current: Option<ShapeBuilder> = None;
    let mut sp_count = 0usize;
    let mut in_captured_rpr = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let local = e.local_name().as_ref().to_vec();
                let parent = stack.last().map(|name| name.as_slice());
                collect(
                    &e,
                    &local,
                    parent,
                    false,
                    &mut current,
                    &mut sp_count,
                    &mut in_captured_rpr,
                )?;
                stack.push(local);
            },
            Ok(Event::Empty(e)) => {
                let local = e.local_name().as_ref().to_vec();
                let parent = stack.last().map(|name| name.as_slice());
                collect(
                    &e,
                    &local,
                    parent,
                    true,
                    &mut current,
                    &mut sp_count,
                    &mut in_captured_rpr,
                )?;
            },
            Ok(Event::Text(e)) => {
                if stack.last().is_some_and(|name| name.as_slice() == b"t")
                    && let Some(shape) = current.as_mut()
                {
                    let text = std::str::from_utf8(e.as_ref())
                        .map_err(|err| Error::Xml(err.to_string()))?;
                    shape.text.push_str(text);
                }
            },
            Ok(Event::End(e)) => {
                stack.pop();
                let local = e.local_name();
                if local.as_ref() == b"rPr" {
                    in_captured_rpr = false;
                }
                if local.as_ref() == b"sp"
                    && let Some(shape) = current.take()
                {
                    shapes.push(shape.finish());
                }
            },
            Ok(Event::Eof) => break,
            Err(err) => return Err(err.into()),
            _ => {},
        }
    }

    Ok(shapes)
}

fn parent_is(parent: Option<&[u8]>, name: &[u8]) -> bool {
    parent.is_some_and(|local| local == name)
}

fn collect(
    e: &BytesStart,
    local: &[u8],
    parent: Option<&[u8]>,
    is_empty: bool,
    current: &mut Option<ShapeBuilder>,
    sp_count: &mut usize,
    in_captured_rpr: &mut bool,
) -> Result<()> {
    if local == b"sp" && parent_is(parent, b"spTree") {
        if !is_empty {
            *current = Some(ShapeBuilder::new(*sp_count));
        }
        *sp_count += 1;
    } else if local == b"off" && parent_is(parent, b"xfrm") {
        if let Some(shape) = current.as_mut()
            && shape.off.is_none()
        {
            shape.off = Some((attr_i64(e, b"x")?, attr_i64(e, b"y")?));
        }
    } else if local == b"ext" && parent_is(parent, b"xfrm") {
        if let Some(shape) = current.as_mut()
            && shape.ext.is_none()
        {
            shape.ext = Some((attr_i64(e, b"cx")?, attr_i64(e, b"cy")?));
        }
    } else if local == b"rPr" && parent_is(parent, b"r") {
        if let Some(shape) = current.as_mut()
            && shape.run_props.is_none()
        {
            let mut props = RunProps::default();
            for attr in e.attributes() {
                let attr = attr?;
                let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
                let value = String::from_utf8_lossy(&attr.value).into_owned();
                if key == "sz" {
                    props.size_centi = value.parse().ok();
                } else {
                    props.attrs.push((key, value));
                }
            }
            shape.run_props = Some(props);
            if !is_empty {
                *in_captured_rpr = true;
            }
        }
    } else if local == b"latin" && parent_is(parent, b"rPr") && *in_captured_rpr {
        if let Some(props) = current.as_mut().and_then(|shape| shape.run_props.as_mut())
            && props.typeface.is_none()
        {
            for attr in e.attributes() {
                let attr = attr?;
                if attr.key.as_ref() == b"typeface" {
                    props.typeface = Some(String::from_utf8_lossy(&attr.value).into_owned());
                }
            }
        }
    } else if local == b"p" && parent_is(parent, b"txBody") {
        if let Some(shape) = current.as_mut()
            && !shape.text.is_empty()
        {
            shape.text.push('\n');
        }
    } else if local == b"br" && parent_is(parent, b"p") {
        if let Some(shape) = current.as_mut() {
            shape.text.push('\n');
        }
    }
    Ok(())
}

fn attr_i64(e: &BytesStart, key: &[u8]) -> Result<i64> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == key {
            let raw = std::str::from_utf8(&attr.value)
                .map_err(|err| Error::Xml(err.to_string()))?;
            return raw.parse().map_err(|_| {
                Error::Xml(format!(
                    "bad {} value: {raw}",
                    String::from_utf8_lossy(key)
                ))
            });
        }
    }
    Err(Error::Xml(format!(
        "missing {} attribute",
        String::from_utf8_lossy(key)
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SLIDE: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr><p:sp><p:nvSpPr><p:cNvPr id="2" name="Cell 1"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr><a:xfrm><a:off x="914400" y="1828800"/><a:ext cx="1371600" cy="914400"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr><p:txBody><a:bodyPr wrap="square" rtlCol="0" tIns="45720" bIns="45720"/><a:lstStyle/><a:p><a:pPr algn="ctr"/><a:r><a:rPr lang="en-US" sz="1800" b="1" dirty="0"><a:latin typeface="Calibri"/></a:rPr><a:t>test</a:t></a:r></a:p></p:txBody></p:sp><p:sp><p:nvSpPr><p:cNvPr id="3" name="Title"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/><a:lstStyle/><a:p><a:r><a:rPr lang="en-US"/><a:t>Bingo Night</a:t></a:r></a:p></p:txBody></p:sp></p:spTree></p:cSld></p:sld>"#;

    #[test]
    fn test_reads_direct_shapes() {
        let shapes = text_shapes(SLIDE.as_bytes()).unwrap();
        assert_eq!(shapes.len(), 2);

        assert_eq!(shapes[0].index, 0);
        assert_eq!(shapes[0].text, "test");
        assert_eq!(
            shapes[0].geometry,
            Some(ShapeGeometry {
                x: 914_400,
                y: 1_828_800,
                cx: 1_371_600,
                cy: 914_400
            })
        );

        assert_eq!(shapes[1].text, "Bingo Night");
        assert_eq!(shapes[1].geometry, None);
    }

    #[test]
    fn test_captures_first_run_props() {
        let shapes = text_shapes(SLIDE.as_bytes()).unwrap();
        let props = shapes[0].run_props.as_ref().unwrap();

        assert_eq!(props.size_centi, Some(1800));
        assert_eq!(props.typeface.as_deref(), Some("Calibri"));
        assert!(props.attrs.contains(&("b".to_owned(), "1".to_owned())));
        assert!(!props.attrs.iter().any(|(key, _)| key == "sz"));
    }

    #[test]
    fn test_multi_paragraph_text_joined_with_newline() {
        let xml = r#"<p:sld xmlns:a="a" xmlns:p="p"><p:cSld><p:spTree><p:sp><p:txBody><a:bodyPr/><a:p><a:r><a:t>one</a:t></a:r></a:p><a:p><a:r><a:t>two</a:t></a:r></a:p></p:txBody></p:sp></p:spTree></p:cSld></p:sld>"#;
        let shapes = text_shapes(xml.as_bytes()).unwrap();
        assert_eq!(shapes[0].text, "one\ntwo");
    }

    #[test]
    fn test_grouped_shapes_not_counted() {
        let xml = r#"<p:sld xmlns:a="a" xmlns:p="p"><p:cSld><p:spTree><p:grpSp><p:sp><p:txBody><a:bodyPr/><a:p><a:r><a:t>inner</a:t></a:r></a:p></p:txBody></p:sp></p:grpSp><p:sp><p:txBody><a:bodyPr/><a:p><a:r><a:t>outer</a:t></a:r></a:p></p:txBody></p:sp></p:spTree></p:cSld></p:sld>"#;
        let shapes = text_shapes(xml.as_bytes()).unwrap();
        assert_eq!(shapes.len(), 1);
        assert_eq!(shapes[0].text, "outer");
        assert_eq!(shapes[0].index, 0);
    }
}
