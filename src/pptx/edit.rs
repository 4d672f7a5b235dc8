//! Slide part rewriting.
//!
//! One streaming pass over the slide XML. Shapes without a staged edit pass
//! through untouched; inside an edited shape the frame geometry, anchoring,
//! and insets are updated in place and the whole text body content is
//! replaced by a single styled run.

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use super::slide::RunProps;
use crate::common::{RGBColor, Result};

/// Staged mutation of one `<p:sp>` element, addressed by shape index.
#[derive(Debug, Clone)]
pub struct ShapeEdit {
    /// Ordinal among the direct `<p:sp>` children of the shape tree
    pub index: usize,
    /// Replacement text
    pub text: String,
    /// Font size in centipoints for the `sz` attribute
    pub font_size_centi: u32,
    /// Solid fill applied to the run, when set
    pub color: Option<RGBColor>,
    /// Force `anchor="ctr"` on `<a:bodyPr>`
    pub anchor_middle: bool,
    /// Force `tIns="0" bIns="0"` on `<a:bodyPr>`
    pub clear_vertical_insets: bool,
    /// New `y` for `<a:off>`, in EMUs
    pub top_emu: i64,
    /// New `cy` for `<a:ext>`, in EMUs
    pub height_emu: i64,
    /// Character properties carried over from the original first run
    pub run_props: Option<RunProps>,
}

/// Apply shape edits to a slide part, returning the rewritten XML.
pub fn apply(xml: &[u8], edits: &[ShapeEdit]) -> Result<Vec<u8>> {
    let mut reader = Reader::from_reader(xml);
    let mut writer = Writer::new(Vec::with_capacity(xml.len()));

    let mut stack: Vec<Vec<u8>> = Vec::new();
    let mut sp_count = 0usize;
    let mut active: Option<&ShapeEdit> = None;
    // Stack depth at which the active shape was entered
    let mut sp_depth = 0usize;
    let mut in_txbody = false;
    let mut first_p_done = false;
    let mut in_first_p = false;
    let mut run_emitted = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let local = e.local_name().as_ref().to_vec();
                let parent = stack.last().map(|name| name.as_slice());

                if local == b"sp" && parent_is(parent, b"spTree") {
                    active = edits.iter().find(|edit| edit.index == sp_count);
                    sp_count += 1;
                    if active.is_some() {
                        sp_depth = stack.len();
                        in_txbody = false;
                        first_p_done = false;
                        in_first_p = false;
                        run_emitted = false;
                    }
                } else if let Some(edit) = active {
                    if local == b"txBody" {
                        in_txbody = true;
                    } else if in_txbody && local == b"p" && parent_is(parent, b"txBody") {
                        if first_p_done {
                            // The replacement text is single-paragraph
                            reader.read_to_end(e.name())?;
                            continue;
                        }
                        in_first_p = true;
                    } else if in_first_p
                        && parent_is(parent, b"p")
                        && is_run_content(&local)
                    {
                        if !run_emitted {
                            write_run(&mut writer, edit)?;
                            run_emitted = true;
                        }
                        reader.read_to_end(e.name())?;
                        continue;
                    } else if local == b"bodyPr" && parent_is(parent, b"txBody") {
                        writer.write_event(Event::Start(rewrite_body_pr(&e, edit)?))?;
                        stack.push(local);
                        continue;
                    }
                }

                writer.write_event(Event::Start(e))?;
                stack.push(local);
            },
            Ok(Event::Empty(e)) => {
                let local = e.local_name().as_ref().to_vec();
                let parent = stack.last().map(|name| name.as_slice());

                if local == b"sp" && parent_is(parent, b"spTree") {
                    // Keep ordinals aligned with the reading pass
                    sp_count += 1;
                } else if let Some(edit) = active {
                    if local == b"off" && parent_is(parent, b"xfrm") && !in_txbody {
                        let off = set_attr(&e, "y", &edit.top_emu.to_string())?;
                        writer.write_event(Event::Empty(off))?;
                        continue;
                    }
                    if local == b"ext" && parent_is(parent, b"xfrm") && !in_txbody {
                        let ext = set_attr(&e, "cy", &edit.height_emu.to_string())?;
                        writer.write_event(Event::Empty(ext))?;
                        continue;
                    }
                    if local == b"bodyPr" && parent_is(parent, b"txBody") {
                        writer.write_event(Event::Empty(rewrite_body_pr(&e, edit)?))?;
                        continue;
                    }
                    if in_first_p && parent_is(parent, b"p") && is_run_content(&local) {
                        if !run_emitted {
                            write_run(&mut writer, edit)?;
                            run_emitted = true;
                        }
                        continue;
                    }
                }

                writer.write_event(Event::Empty(e))?;
            },
            Ok(Event::End(e)) => {
                stack.pop();
                let local = e.local_name().as_ref().to_vec();

                if let Some(edit) = active {
                    if in_first_p && local == b"p" {
                        if !run_emitted {
                            write_run(&mut writer, edit)?;
                            run_emitted = true;
                        }
                        in_first_p = false;
                        first_p_done = true;
                    } else if local == b"txBody" {
                        in_txbody = false;
                    } else if local == b"sp" && stack.len() == sp_depth {
                        active = None;
                    }
                }

                writer.write_event(Event::End(e))?;
            },
            Ok(Event::Eof) => break,
            Err(err) => return Err(err.into()),
            Ok(other) => writer.write_event(other)?,
        }
    }

    Ok(writer.into_inner())
}

fn parent_is(parent: Option<&[u8]>, name: &[u8]) -> bool {
    parent.is_some_and(|local| local == name)
}

/// Paragraph children displaced by the replacement run.
fn is_run_content(local: &[u8]) -> bool {
    local == b"r" || local == b"br" || local == b"fld" || local == b"endParaRPr"
}

/// Copy an element, overriding one attribute.
fn set_attr(e: &BytesStart, key: &str, value: &str) -> Result<BytesStart<'static>> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut out = BytesStart::new(name);
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.as_ref() != key.as_bytes() {
            out.push_attribute(attr);
        }
    }
    out.push_attribute((key, value));
    Ok(out)
}

/// Copy `<a:bodyPr>`, forcing the anchoring and inset attributes the edit
/// asks for.
fn rewrite_body_pr(e: &BytesStart, edit: &ShapeEdit) -> Result<BytesStart<'static>> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut out = BytesStart::new(name);

    for attr in e.attributes() {
        let attr = attr?;
        let key = attr.key.as_ref();
        let displaced = (edit.anchor_middle && key == b"anchor")
            || (edit.clear_vertical_insets && (key == b"tIns" || key == b"bIns"));
        if !displaced {
            out.push_attribute(attr);
        }
    }

    if edit.anchor_middle {
        out.push_attribute(("anchor", "ctr"));
    }
    if edit.clear_vertical_insets {
        out.push_attribute(("tIns", "0"));
        out.push_attribute(("bIns", "0"));
    }

    Ok(out)
}

/// Write the replacement `<a:r>` for an edited shape.
fn write_run<W: std::io::Write>(writer: &mut Writer<W>, edit: &ShapeEdit) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new("a:r")))?;

    let mut rpr = BytesStart::new("a:rPr");
    match &edit.run_props {
        Some(props) => {
            for (key, value) in &props.attrs {
                rpr.push_attribute((key.as_str(), value.as_str()));
            }
        },
        None => {
            rpr.push_attribute(("lang", "en-US"));
            rpr.push_attribute(("dirty", "0"));
        },
    }
    rpr.push_attribute(("sz", edit.font_size_centi.to_string().as_str()));
    writer.write_event(Event::Start(rpr))?;

    if let Some(color) = edit.color {
        writer.write_event(Event::Start(BytesStart::new("a:solidFill")))?;
        let mut fill = BytesStart::new("a:srgbClr");
        fill.push_attribute(("val", color.to_hex().as_str()));
        writer.write_event(Event::Empty(fill))?;
        writer.write_event(Event::End(BytesEnd::new("a:solidFill")))?;
    }

    if let Some(typeface) = edit
        .run_props
        .as_ref()
        .and_then(|props| props.typeface.as_deref())
    {
        let mut latin = BytesStart::new("a:latin");
        latin.push_attribute(("typeface", typeface));
        writer.write_event(Event::Empty(latin))?;
    }

    writer.write_event(Event::End(BytesEnd::new("a:rPr")))?;
    writer.write_event(Event::Start(BytesStart::new("a:t")))?;
    writer.write_event(Event::Text(BytesText::new(&edit.text)))?;
    writer.write_event(Event::End(BytesEnd::new("a:t")))?;
    writer.write_event(Event::End(BytesEnd::new("a:r")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::unit::pt_to_emu;
    use crate::pptx::slide::{self, RunProps};

    const SLIDE: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:spTree><p:sp><p:nvSpPr><p:cNvPr id="2" name="Cell 1"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr><a:xfrm><a:off x="914400" y="1828800"/><a:ext cx="1371600" cy="914400"/></a:xfrm></p:spPr><p:txBody><a:bodyPr wrap="square" anchor="t" tIns="45720" bIns="45720"/><a:lstStyle/><a:p><a:pPr algn="ctr"/><a:r><a:rPr lang="en-US" sz="1800" b="1"><a:latin typeface="Calibri"/></a:rPr><a:t>test</a:t></a:r><a:r><a:rPr lang="en-US"/><a:t>leftover</a:t></a:r></a:p><a:p><a:r><a:t>second paragraph</a:t></a:r></a:p></p:txBody></p:sp><p:sp><p:nvSpPr><p:cNvPr id="3" name="Title"/></p:nvSpPr><p:spPr><a:xfrm><a:off x="1" y="2"/><a:ext cx="3" cy="4"/></a:xfrm></p:spPr><p:txBody><a:bodyPr/><a:lstStyle/><a:p><a:r><a:rPr lang="en-US"/><a:t>Bingo Night</a:t></a:r></a:p></p:txBody></p:sp></p:spTree></p:cSld></p:sld>"#;

    fn edit_for(index: usize) -> ShapeEdit {
        ShapeEdit {
            index,
            text: "free pizza".to_owned(),
            font_size_centi: 960,
            color: Some(RGBColor::new(204, 85, 0)),
            anchor_middle: true,
            clear_vertical_insets: true,
            top_emu: pt_to_emu(109.0),
            height_emu: pt_to_emu(73.0),
            run_props: Some(RunProps {
                attrs: vec![
                    ("lang".to_owned(), "en-US".to_owned()),
                    ("b".to_owned(), "1".to_owned()),
                ],
                size_centi: Some(1800),
                typeface: Some("Calibri".to_owned()),
            }),
        }
    }

    #[test]
    fn test_apply_rewrites_target_shape() {
        let patched = apply(SLIDE.as_bytes(), &[edit_for(0)]).unwrap();
        let out = String::from_utf8(patched).unwrap();

        assert!(out.contains(r#"sz="960""#));
        assert!(out.contains(r#"<a:srgbClr val="CC5500"/>"#));
        assert!(out.contains(r#"anchor="ctr""#));
        assert!(out.contains(r#"tIns="0""#));
        assert!(out.contains(r#"bIns="0""#));
        assert!(out.contains(r#"<a:latin typeface="Calibri"/>"#));
        assert!(out.contains("<a:t>free pizza</a:t>"));
        assert!(!out.contains("<a:t>test</a:t>"));
        assert!(!out.contains("leftover"));
        assert!(!out.contains("second paragraph"));
        // Paragraph properties survive
        assert!(out.contains(r#"<a:pPr algn="ctr"/>"#));
    }

    #[test]
    fn test_apply_updates_geometry() {
        let patched = apply(SLIDE.as_bytes(), &[edit_for(0)]).unwrap();
        let shapes = slide::text_shapes(&patched).unwrap();

        let geometry = shapes[0].geometry.unwrap();
        assert_eq!(geometry.x, 914_400);
        assert_eq!(geometry.y, pt_to_emu(109.0));
        assert_eq!(geometry.cx, 1_371_600);
        assert_eq!(geometry.cy, pt_to_emu(73.0));
        assert_eq!(shapes[0].text, "free pizza");
    }

    #[test]
    fn test_apply_leaves_other_shapes_alone() {
        let patched = apply(SLIDE.as_bytes(), &[edit_for(0)]).unwrap();
        let out = String::from_utf8(patched).unwrap();

        assert!(out.contains("<a:t>Bingo Night</a:t>"));
        assert!(out.contains(r#"<a:off x="1" y="2"/>"#));
        assert!(out.contains(r#"<a:ext cx="3" cy="4"/>"#));
    }

    #[test]
    fn test_apply_without_edits_is_identity_for_content() {
        let patched = apply(SLIDE.as_bytes(), &[]).unwrap();
        let shapes = slide::text_shapes(&patched).unwrap();
        // Run text concatenates without separators, paragraphs with newlines
        assert_eq!(shapes[0].text, "testleftover\nsecond paragraph");
        assert_eq!(shapes[1].text, "Bingo Night");
    }

    #[test]
    fn test_apply_default_run_props() {
        let mut edit = edit_for(0);
        edit.run_props = None;
        edit.color = None;
        let patched = apply(SLIDE.as_bytes(), &[edit]).unwrap();
        let out = String::from_utf8(patched).unwrap();

        assert!(out.contains(r#"<a:rPr lang="en-US" dirty="0" sz="960">"#));
        assert!(!out.contains("srgbClr"));
    }
}
