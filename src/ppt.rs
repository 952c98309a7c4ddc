//! PPT Deck Writer Module
//! Writes a Deck as a PowerPoint package: title, text, code and figure slides.
//!
//! Uses direct ZIP/XML generation so images can be embedded without a
//! presentation library.

use crate::deck::{Deck, Slide, SlideBody};
use crate::error::Result;
use std::fs::File;
use std::io::{Seek, Write};
use std::path::Path;
use zip::write::FileOptions;
use zip::ZipWriter;

/// EMU (English Metric Units) conversion: 914400 EMU = 1 inch
const EMU_PER_INCH: i64 = 914400;
/// 16:9 slide, 13.333 x 7.5 inches
const SLIDE_WIDTH: i64 = 12192000;
const SLIDE_HEIGHT: i64 = 6858000;
const MARGIN: i64 = EMU_PER_INCH / 2;
const HEADING_HEIGHT: i64 = EMU_PER_INCH;

const NS: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const PKG_REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

/// Text run styling
#[derive(Clone, Copy)]
struct Run {
    size: u32, // hundredths of a point
    bold: bool,
    mono: bool,
    centered: bool,
}

const TITLE_RUN: Run = Run { size: 4000, bold: true, mono: false, centered: true };
const SUBTITLE_RUN: Run = Run { size: 2400, bold: false, mono: false, centered: true };
const HEADING_RUN: Run = Run { size: 3200, bold: true, mono: false, centered: false };
const BODY_RUN: Run = Run { size: 2000, bold: false, mono: false, centered: false };
const CODE_RUN: Run = Run { size: 1400, bold: false, mono: true, centered: false };

/// PPT generator for slide decks
pub struct PptGenerator;

impl PptGenerator {
    pub fn write(deck: &Deck, output_path: &Path) -> Result<()> {
        let file = File::create(output_path)?;
        Self::write_to(deck, file)?;
        tracing::info!(
            "PPT generated: {} ({} slides, {} images)",
            output_path.display(),
            deck.slides.len(),
            deck.figure_count()
        );
        Ok(())
    }

    pub fn write_to<W: Write + Seek>(deck: &Deck, writer: W) -> Result<()> {
        let mut zip = ZipWriter::new(writer);
        let options = FileOptions::default();
        let slide_count = deck.slides.len();

        zip.start_file("[Content_Types].xml", options)?;
        zip.write_all(Self::content_types_xml(slide_count).as_bytes())?;

        zip.start_file("_rels/.rels", options)?;
        zip.write_all(Self::rels_xml().as_bytes())?;

        zip.start_file("ppt/_rels/presentation.xml.rels", options)?;
        zip.write_all(Self::presentation_rels_xml(slide_count).as_bytes())?;

        zip.start_file("ppt/presentation.xml", options)?;
        zip.write_all(Self::presentation_xml(slide_count).as_bytes())?;

        let mut image_idx = 0;
        for (idx, slide) in deck.slides.iter().enumerate() {
            let slide_num = idx + 1;
            let image_id = match &slide.body {
                SlideBody::Figure { png, .. } => {
                    image_idx += 1;
                    zip.start_file(format!("ppt/media/image{}.png", image_idx), options)?;
                    zip.write_all(png)?;
                    Some(image_idx)
                }
                _ => None,
            };

            zip.start_file(format!("ppt/slides/_rels/slide{}.xml.rels", slide_num), options)?;
            zip.write_all(Self::slide_rels_xml(image_id).as_bytes())?;

            zip.start_file(format!("ppt/slides/slide{}.xml", slide_num), options)?;
            zip.write_all(Self::slide_xml(slide).as_bytes())?;
        }

        zip.start_file("ppt/slideLayouts/slideLayout1.xml", options)?;
        zip.write_all(Self::slide_layout_xml().as_bytes())?;
        zip.start_file("ppt/slideLayouts/_rels/slideLayout1.xml.rels", options)?;
        zip.write_all(Self::layout_rels_xml().as_bytes())?;

        zip.start_file("ppt/slideMasters/slideMaster1.xml", options)?;
        zip.write_all(Self::slide_master_xml().as_bytes())?;
        zip.start_file("ppt/slideMasters/_rels/slideMaster1.xml.rels", options)?;
        zip.write_all(Self::master_rels_xml().as_bytes())?;

        zip.start_file("ppt/theme/theme1.xml", options)?;
        zip.write_all(Self::theme_xml().as_bytes())?;

        zip.start_file("docProps/core.xml", options)?;
        zip.write_all(Self::core_props_xml(&deck.title).as_bytes())?;
        zip.start_file("docProps/app.xml", options)?;
        zip.write_all(Self::app_props_xml(slide_count).as_bytes())?;

        zip.finish()?;
        Ok(())
    }

    fn content_types_xml(slide_count: usize) -> String {
        let mut xml = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Default Extension="png" ContentType="image/png"/>
<Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/>
<Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"/>
<Override PartName="/ppt/slideLayouts/slideLayout1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/>
<Override PartName="/ppt/theme/theme1.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/>
<Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>
<Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>
"#
        .to_string();

        for i in 1..=slide_count {
            xml.push_str(&format!(
                r#"<Override PartName="/ppt/slides/slide{}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#,
                i
            ));
            xml.push('\n');
        }
        xml.push_str("</Types>");
        xml
    }

    fn relationship(id: usize, kind: &str, target: &str) -> String {
        format!(
            r#"<Relationship Id="rId{}" Type="{}/{}" Target="{}"/>"#,
            id, REL_NS, kind, target
        )
    }

    fn relationships(items: &[String]) -> String {
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n<Relationships xmlns=\"{}\">\n{}\n</Relationships>",
            PKG_REL_NS,
            items.join("\n")
        )
    }

    fn rels_xml() -> String {
        Self::relationships(&[
            Self::relationship(1, "officeDocument", "ppt/presentation.xml"),
            format!(
                r#"<Relationship Id="rId2" Type="{}/metadata/core-properties" Target="docProps/core.xml"/>"#,
                PKG_REL_NS
            ),
            Self::relationship(3, "extended-properties", "docProps/app.xml"),
        ])
    }

    /// rId1 master, rId2 theme, slides from rId3
    fn presentation_rels_xml(slide_count: usize) -> String {
        let mut items = vec![
            Self::relationship(1, "slideMaster", "slideMasters/slideMaster1.xml"),
            Self::relationship(2, "theme", "theme/theme1.xml"),
        ];
        items.extend(
            (1..=slide_count)
                .map(|i| Self::relationship(i + 2, "slide", &format!("slides/slide{}.xml", i))),
        );
        Self::relationships(&items)
    }

    fn presentation_xml(slide_count: usize) -> String {
        let slide_ids: String = (1..=slide_count)
            .map(|i| format!(r#"<p:sldId id="{}" r:id="rId{}"/>"#, 255 + i, i + 2))
            .collect();

        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentation {} saveSubsetFonts="1">
<p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>
<p:sldIdLst>{}</p:sldIdLst>
<p:sldSz cx="{}" cy="{}"/>
<p:notesSz cx="{}" cy="{}"/>
</p:presentation>"#,
            NS, slide_ids, SLIDE_WIDTH, SLIDE_HEIGHT, SLIDE_HEIGHT, SLIDE_WIDTH
        )
    }

    /// rId1 layout, rId2 the slide's picture if it has one
    fn slide_rels_xml(image_id: Option<usize>) -> String {
        let mut items = vec![Self::relationship(
            1,
            "slideLayout",
            "../slideLayouts/slideLayout1.xml",
        )];
        if let Some(id) = image_id {
            items.push(Self::relationship(
                2,
                "image",
                &format!("../media/image{}.png", id),
            ));
        }
        Self::relationships(&items)
    }

    fn slide_xml(slide: &Slide) -> String {
        let mut shapes = String::new();
        let mut next_id = 2;
        let content_top = MARGIN + HEADING_HEIGHT;
        let content_w = SLIDE_WIDTH - 2 * MARGIN;
        let content_h = SLIDE_HEIGHT - content_top - MARGIN;

        match &slide.body {
            SlideBody::Title { subtitle } => {
                let title = slide.heading.as_deref().unwrap_or_default();
                shapes.push_str(&Self::text_box(
                    next_id,
                    (MARGIN, SLIDE_HEIGHT / 3, content_w, 2 * HEADING_HEIGHT),
                    &[title],
                    TITLE_RUN,
                ));
                next_id += 1;
                if let Some(sub) = subtitle {
                    shapes.push_str(&Self::text_box(
                        next_id,
                        (MARGIN, SLIDE_HEIGHT / 3 + 2 * HEADING_HEIGHT, content_w, HEADING_HEIGHT),
                        &[sub.as_str()],
                        SUBTITLE_RUN,
                    ));
                }
            }
            body => {
                if let Some(heading) = &slide.heading {
                    shapes.push_str(&Self::text_box(
                        next_id,
                        (MARGIN, MARGIN / 2, content_w, HEADING_HEIGHT),
                        &[heading.as_str()],
                        HEADING_RUN,
                    ));
                    next_id += 1;
                }
                let frame = (MARGIN, content_top, content_w, content_h);
                match body {
                    SlideBody::Text(paragraphs) => {
                        let lines: Vec<&str> = paragraphs.iter().map(String::as_str).collect();
                        shapes.push_str(&Self::text_box(next_id, frame, &lines, BODY_RUN));
                    }
                    SlideBody::Code(code) => {
                        let lines: Vec<&str> = code.lines().collect();
                        shapes.push_str(&Self::text_box(next_id, frame, &lines, CODE_RUN));
                    }
                    SlideBody::Figure { width, height, .. } => {
                        let area = if slide.heading.is_some() {
                            frame
                        } else {
                            (MARGIN, MARGIN, content_w, SLIDE_HEIGHT - 2 * MARGIN)
                        };
                        shapes.push_str(&Self::picture(next_id, fit(area, *width, *height)));
                    }
                    SlideBody::Title { .. } => {}
                }
            }
        }

        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld {}>
<p:cSld>
<p:spTree>
<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>
<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>
{}
</p:spTree>
</p:cSld>
<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>
</p:sld>"#,
            NS, shapes
        )
    }

    fn text_box(id: usize, (x, y, w, h): (i64, i64, i64, i64), lines: &[&str], run: Run) -> String {
        let align = if run.centered { r#" algn="ctr""# } else { "" };
        let font = if run.mono {
            r#"<a:latin typeface="Courier New"/>"#
        } else {
            ""
        };
        let paragraphs: String = lines
            .iter()
            .map(|line| {
                format!(
                    r#"<a:p><a:pPr{}/><a:r><a:rPr lang="en-US" sz="{}" b="{}" dirty="0">{}</a:rPr><a:t>{}</a:t></a:r></a:p>"#,
                    align,
                    run.size,
                    u8::from(run.bold),
                    font,
                    xml_escape(line)
                )
            })
            .collect();
        // an empty txBody still needs one paragraph
        let paragraphs = if paragraphs.is_empty() {
            "<a:p/>".to_string()
        } else {
            paragraphs
        };

        format!(
            r#"
<p:sp>
<p:nvSpPr><p:cNvPr id="{}" name="TextBox {}"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr>
<p:spPr><a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/></p:spPr>
<p:txBody><a:bodyPr wrap="square" rtlCol="0"><a:normAutofit/></a:bodyPr><a:lstStyle/>{}</p:txBody>
</p:sp>"#,
            id, id, x, y, w, h, paragraphs
        )
    }

    fn picture(id: usize, (x, y, w, h): (i64, i64, i64, i64)) -> String {
        format!(
            r#"
<p:pic>
<p:nvPicPr>
<p:cNvPr id="{}" name="Picture {}"/>
<p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr>
<p:nvPr/>
</p:nvPicPr>
<p:blipFill>
<a:blip r:embed="rId2"/>
<a:stretch><a:fillRect/></a:stretch>
</p:blipFill>
<p:spPr>
<a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm>
<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>
</p:spPr>
</p:pic>"#,
            id, id, x, y, w, h
        )
    }

    fn empty_tree() -> &'static str {
        r#"<p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr></p:spTree>"#
    }

    fn slide_layout_xml() -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldLayout {} type="blank" preserve="1">
<p:cSld name="Blank">{}</p:cSld>
<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>
</p:sldLayout>"#,
            NS,
            Self::empty_tree()
        )
    }

    fn layout_rels_xml() -> String {
        Self::relationships(&[Self::relationship(
            1,
            "slideMaster",
            "../slideMasters/slideMaster1.xml",
        )])
    }

    fn slide_master_xml() -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldMaster {}>
<p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg>{}</p:cSld>
<p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/>
<p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst>
</p:sldMaster>"#,
            NS,
            Self::empty_tree()
        )
    }

    fn master_rels_xml() -> String {
        Self::relationships(&[
            Self::relationship(1, "slideLayout", "../slideLayouts/slideLayout1.xml"),
            Self::relationship(2, "theme", "../theme/theme1.xml"),
        ])
    }

    /// Plain theme: tab10-like accents, solid fills only.
    fn theme_xml() -> String {
        let accents = ["1F77B4", "FF7F0E", "2CA02C", "D62728", "9467BD", "8C564B"];
        let accent_xml: String = accents
            .iter()
            .enumerate()
            .map(|(i, c)| format!(r#"<a:accent{0}><a:srgbClr val="{1}"/></a:accent{0}>"#, i + 1, c))
            .collect();
        let solid = r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#;
        let line = |w: u32| {
            format!(
                r#"<a:ln w="{}" cap="flat" cmpd="sng" algn="ctr">{}<a:prstDash val="solid"/></a:ln>"#,
                w, solid
            )
        };

        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Slides">
<a:themeElements>
<a:clrScheme name="Slides"><a:dk1><a:srgbClr val="000000"/></a:dk1><a:lt1><a:srgbClr val="FFFFFF"/></a:lt1><a:dk2><a:srgbClr val="333333"/></a:dk2><a:lt2><a:srgbClr val="EEEEEE"/></a:lt2>{accents}<a:hlink><a:srgbClr val="1F77B4"/></a:hlink><a:folHlink><a:srgbClr val="9467BD"/></a:folHlink></a:clrScheme>
<a:fontScheme name="Slides"><a:majorFont><a:latin typeface="Calibri Light"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont><a:minorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont></a:fontScheme>
<a:fmtScheme name="Slides"><a:fillStyleLst>{s}{s}{s}</a:fillStyleLst><a:lnStyleLst>{l1}{l2}{l3}</a:lnStyleLst><a:effectStyleLst><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle></a:effectStyleLst><a:bgFillStyleLst>{s}{s}{s}</a:bgFillStyleLst></a:fmtScheme>
</a:themeElements>
<a:objectDefaults/>
<a:extraClrSchemeLst/>
</a:theme>"#,
            accents = accent_xml,
            s = solid,
            l1 = line(6350),
            l2 = line(12700),
            l3 = line(19050),
        )
    }

    fn core_props_xml(title: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
<dc:title>{}</dc:title>
<dc:creator>mpl-slides</dc:creator>
<cp:lastModifiedBy>mpl-slides</cp:lastModifiedBy>
<cp:revision>1</cp:revision>
</cp:coreProperties>"#,
            xml_escape(title)
        )
    }

    fn app_props_xml(slide_count: usize) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">
<Application>mpl-slides</Application>
<PresentationFormat>Widescreen</PresentationFormat>
<Slides>{}</Slides>
<Notes>0</Notes>
<HiddenSlides>0</HiddenSlides>
</Properties>"#,
            slide_count
        )
    }
}

/// Largest box with the image's aspect ratio inside `area`, centred.
fn fit((x, y, w, h): (i64, i64, i64, i64), img_w: u32, img_h: u32) -> (i64, i64, i64, i64) {
    if img_w == 0 || img_h == 0 {
        return (x, y, w, h);
    }
    let scale = (w as f64 / img_w as f64).min(h as f64 / img_h as f64);
    let fw = (img_w as f64 * scale) as i64;
    let fh = (img_h as f64 * scale) as i64;
    (x + (w - fw) / 2, y + (h - fh) / 2, fw, fh)
}

fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};
    use tempfile::tempdir;
    use zip::ZipArchive;

    fn sample_deck() -> Deck {
        Deck {
            title: "Scores & more".into(),
            slides: vec![
                Slide {
                    heading: Some("Scores & more".into()),
                    body: SlideBody::Title { subtitle: Some("Q3".into()) },
                },
                Slide {
                    heading: Some("Slide".into()),
                    body: SlideBody::Text(vec!["Here is my side again.".into()]),
                },
                Slide {
                    heading: None,
                    body: SlideBody::Code("if a < b:\n    pass".into()),
                },
                Slide {
                    heading: None,
                    body: SlideBody::Figure {
                        png: b"\x89PNG data".to_vec(),
                        width: 800,
                        height: 600,
                    },
                },
            ],
        }
    }

    fn read_entry(archive: &mut ZipArchive<Cursor<Vec<u8>>>, name: &str) -> String {
        let mut content = String::new();
        archive
            .by_name(name)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        content
    }

    #[test]
    fn test_package_parts() {
        let mut buf = Cursor::new(Vec::new());
        PptGenerator::write_to(&sample_deck(), &mut buf).unwrap();
        let mut archive = ZipArchive::new(Cursor::new(buf.into_inner())).unwrap();

        let names: Vec<String> = archive.file_names().map(str::to_string).collect();
        for part in [
            "[Content_Types].xml",
            "ppt/presentation.xml",
            "ppt/slides/slide4.xml",
            "ppt/slides/_rels/slide4.xml.rels",
            "ppt/media/image1.png",
            "ppt/theme/theme1.xml",
        ] {
            assert!(names.iter().any(|n| n == part), "missing {}", part);
        }
        assert!(!names.iter().any(|n| n == "ppt/media/image2.png"));

        let types = read_entry(&mut archive, "[Content_Types].xml");
        assert_eq!(types.matches("presentationml.slide+xml").count(), 4);

        let core = read_entry(&mut archive, "docProps/core.xml");
        assert!(core.contains("<dc:title>Scores &amp; more</dc:title>"));
    }

    #[test]
    fn test_slide_contents() {
        let mut buf = Cursor::new(Vec::new());
        PptGenerator::write_to(&sample_deck(), &mut buf).unwrap();
        let mut archive = ZipArchive::new(Cursor::new(buf.into_inner())).unwrap();

        let title = read_entry(&mut archive, "ppt/slides/slide1.xml");
        assert!(title.contains("<a:t>Q3</a:t>"));

        let code = read_entry(&mut archive, "ppt/slides/slide3.xml");
        assert!(code.contains("<a:t>if a &lt; b:</a:t>"));
        assert!(code.contains("Courier New"));

        let figure_rels = read_entry(&mut archive, "ppt/slides/_rels/slide4.xml.rels");
        assert!(figure_rels.contains("../media/image1.png"));
        let text_rels = read_entry(&mut archive, "ppt/slides/_rels/slide2.xml.rels");
        assert!(!text_rels.contains("image"));
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("deck.pptx");
        PptGenerator::write(&sample_deck(), &path).unwrap();
        assert!(path.metadata().unwrap().len() > 0);
    }

    #[test]
    fn test_demo_notebook_deck() {
        use crate::config::RenderConfig;
        use crate::notebook::{fixtures::DEMO_NOTEBOOK, Notebook};

        let nb = Notebook::parse(DEMO_NOTEBOOK).unwrap();
        let deck = Deck::from_notebook(&nb, &RenderConfig::default()).unwrap();
        let mut buf = Cursor::new(Vec::new());
        PptGenerator::write_to(&deck, &mut buf).unwrap();
        let mut archive = ZipArchive::new(Cursor::new(buf.into_inner())).unwrap();

        let names: Vec<String> = archive.file_names().map(str::to_string).collect();
        let slides = names
            .iter()
            .filter(|n| n.starts_with("ppt/slides/slide"))
            .count();
        let media = names.iter().filter(|n| n.starts_with("ppt/media/")).count();
        assert_eq!((slides, media), (3, 1));

        let mut png = Vec::new();
        archive
            .by_name("ppt/media/image1.png")
            .unwrap()
            .read_to_end(&mut png)
            .unwrap();
        assert_eq!(&png[1..4], b"PNG");

        let heading = read_entry(&mut archive, "ppt/slides/slide2.xml");
        assert!(heading.contains("<a:t>Slide</a:t>"));
    }

    #[test]
    fn test_fit_keeps_aspect_ratio() {
        let (x, y, w, h) = fit((0, 0, 1000, 1000), 800, 400);
        assert_eq!((w, h), (1000, 500));
        assert_eq!((x, y), (0, 250));
    }
}
