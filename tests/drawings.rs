mod common;

use common::{first_paragraph, paragraphs, parse_body, parse_package, parse_package_with, rels};
use docxide_model::model::{
    AnchorType, ImageSource, TextBoxKind, TextContainer, UnresolvedReason,
};
use docxide_model::{MemoryPackage, ParserOptions};

const TEXTBOX_ALTERNATE: &str = r#"<w:p><w:r><mc:AlternateContent>
  <mc:Choice Requires="wps">
    <w:drawing>
      <wp:anchor behindDoc="0" relativeHeight="251659264">
        <wp:positionH relativeFrom="column"><wp:posOffset>12700</wp:posOffset></wp:positionH>
        <wp:positionV relativeFrom="paragraph"><wp:align>top</wp:align></wp:positionV>
        <wp:extent cx="1270000" cy="635000"/>
        <wp:wrapSquare wrapText="bothSides"/>
        <wp:docPr id="1" name="Text Box 1"/>
        <a:graphic><a:graphicData uri="http://schemas.microsoft.com/office/word/2010/wordprocessingShape">
          <wps:wsp><wps:txbx><w:txbxContent>
            <w:p><w:r><w:t>boxed</w:t></w:r></w:p>
            <w:p><w:r><w:rPr><w:b/></w:rPr><w:t>second</w:t></w:r></w:p>
          </w:txbxContent></wps:txbx></wps:wsp>
        </a:graphicData></a:graphic>
      </wp:anchor>
    </w:drawing>
  </mc:Choice>
  <mc:Fallback>
    <w:pict><v:shape id="tb1" style="width:100pt;height:50pt"><v:textbox><w:txbxContent>
      <w:p><w:r><w:t>boxed</w:t></w:r></w:p>
    </w:txbxContent></v:textbox></v:shape></w:pict>
  </mc:Fallback>
</mc:AlternateContent></w:r></w:p>"#;

fn inline_picture(blip_attrs: &str) -> String {
    format!(
        r#"<w:r><w:drawing><wp:inline>
             <wp:extent cx="914400" cy="457200"/>
             <wp:docPr id="7" name="Picture 1" descr="logo"/>
             <a:graphic><a:graphicData><pic:pic><pic:blipFill><a:blip {blip_attrs}/></pic:blipFill></pic:pic></a:graphicData></a:graphic>
           </wp:inline></w:drawing></w:r>"#
    )
}

#[test]
fn drawingml_textbox_prefers_choice_and_anchors_runs() {
    let body = parse_body(TEXTBOX_ALTERNATE);
    let p = first_paragraph(&body);
    assert_eq!(p.runs.len(), 1);

    let run = &p.runs[0];
    assert_eq!(run.text, "");
    assert!(run.has_drawing);
    assert!(run.raw_xml.is_some());

    let inner = run.textbox.as_ref().unwrap();
    let texts: Vec<&str> = inner.iter().map(|r| r.get_text()).collect();
    assert_eq!(texts, vec!["boxed", "second"]);
    assert_eq!(inner[1].style.bold, Some(true));

    let anchor = run.anchor.as_ref().unwrap();
    assert_eq!(anchor.anchor_type, AnchorType::Anchor);
    assert_eq!(anchor.width_pt(), 100.0);
    assert_eq!(anchor.height_pt(), 50.0);
    assert_eq!(anchor.position_h.as_ref().unwrap().offset, Some(12700));
    assert_eq!(
        anchor.position_h.as_ref().unwrap().relative_from.as_deref(),
        Some("column")
    );
    assert_eq!(
        anchor.position_v.as_ref().unwrap().align.as_deref(),
        Some("top")
    );
    assert_eq!(anchor.wrap.as_deref(), Some("wrapSquare"));
    assert_eq!(anchor.relative_height, Some(251659264));
    assert!(!anchor.behind_doc);
    assert!(inner.iter().all(|r| r.anchor.as_ref() == Some(anchor)));

    let tb = run.textbox_model().unwrap();
    assert_eq!(tb.kind, TextBoxKind::DrawingMl);
    assert_eq!(tb.content.get_paragraphs().len(), 2);
    assert!(tb.raw_xml.is_some());
}

#[test]
fn vml_textbox() {
    let body = parse_body(
        r#"<w:p><w:r><w:pict>
             <v:shape id="_x0000_s1026" style="position:absolute;margin-left:36pt;margin-top:1in;width:2in;height:72pt;z-index:2">
               <v:textbox><w:txbxContent><w:p><w:r><w:t>vml box</w:t></w:r></w:p></w:txbxContent></v:textbox>
             </v:shape>
           </w:pict></w:r></w:p>"#,
    );
    let run = &first_paragraph(&body).runs[0];
    assert!(run.watermark.is_none());

    let tb = run.textbox_model().unwrap();
    assert_eq!(tb.kind, TextBoxKind::Vml);
    assert_eq!(tb.content.get_text(), "vml box");

    let anchor = tb.anchor.as_ref().unwrap();
    assert_eq!(anchor.anchor_type, AnchorType::Anchor);
    assert_eq!(anchor.extent_cx, 1_828_800);
    assert_eq!(anchor.extent_cy, 914_400);
    assert_eq!(anchor.position_h.as_ref().unwrap().offset, Some(457_200));
    assert_eq!(anchor.position_v.as_ref().unwrap().offset, Some(914_400));
    assert_eq!(anchor.relative_height, Some(2));
    assert!(!anchor.behind_doc);
    assert_eq!(run.textbox.as_ref().unwrap()[0].anchor.as_ref(), Some(anchor));
}

const WATERMARK: &str = r#"<w:p>
  <w:r><w:pict>
    <v:shape id="PowerPlusWaterMarkObject357" o:spid="_x0000_s2049"
             style="position:absolute;width:400pt;height:100pt;z-index:-251657216">
      <v:textpath style="font-family:&quot;Calibri&quot;" string="DRAFT"/>
    </v:shape>
  </w:pict></w:r>
  <w:r><w:t>body text</w:t></w:r>
</w:p>"#;

#[test]
fn vml_watermark_is_flagged() {
    let body = parse_body(WATERMARK);
    let p = first_paragraph(&body);
    assert_eq!(p.runs.len(), 2);
    let mark = p.runs[0].watermark.as_ref().unwrap();
    assert!(p.runs[0].is_watermark());
    assert_eq!(mark.shape_id.as_deref(), Some("PowerPlusWaterMarkObject357"));
    assert_eq!(mark.text.as_deref(), Some("DRAFT"));
    assert!(mark.style.as_deref().unwrap().contains("z-index:-251657216"));
    assert!(p.runs[0].textbox.is_none());
}

#[test]
fn absolute_shape_without_textbox_is_a_watermark() {
    let body = parse_body(
        r#"<w:p><w:r><w:pict><v:rect style="position:absolute;width:10pt;height:10pt"/></w:pict></w:r></w:p>"#,
    );
    let mark = first_paragraph(&body).runs[0].watermark.as_ref().unwrap();
    assert_eq!(mark.shape_id, None);
    assert_eq!(mark.text, None);
}

#[test]
fn watermarks_can_be_skipped() {
    let body = parse_package_with(
        &common::package(WATERMARK),
        ParserOptions {
            skip_watermarks: true,
            ..Default::default()
        },
    );
    let p = first_paragraph(&body);
    assert_eq!(p.runs.len(), 1);
    assert_eq!(p.get_text(), "body text");
}

#[test]
fn image_sources_resolve_through_relationships() {
    let body_xml = format!(
        "<w:p>{}{}{}{}{}</w:p>",
        inline_picture(r#"r:embed="rId1""#),
        inline_picture(r#"r:embed="rId2""#),
        inline_picture(r#"r:embed="rId9""#),
        inline_picture(""),
        inline_picture(r#"r:link="rId3""#),
    );
    let pkg = MemoryPackage::new()
        .with_part("word/document.xml", common::document(&body_xml))
        .with_part(
            "word/_rels/document.xml.rels",
            rels(&[
                ("rId1", common::REL_IMAGE, "media/image1.png", false),
                ("rId2", common::REL_HYPERLINK, "https://example.com/", true),
                ("rId3", common::REL_IMAGE, "https://example.com/logo.png", true),
            ]),
        );
    let body = parse_package(&pkg);
    let images = body.get_images();
    assert_eq!(images.len(), 5);

    let first = images[0];
    assert_eq!(
        first.source,
        ImageSource::Resolved {
            path: "word/media/image1.png".into(),
            external: false
        }
    );
    assert_eq!(first.rel_id.as_deref(), Some("rId1"));
    assert_eq!(first.width_pt(), 72.0);
    assert_eq!(first.height_pt(), 36.0);
    assert_eq!(first.anchor_type, AnchorType::Inline);
    assert_eq!(first.name.as_deref(), Some("Picture 1"));
    assert_eq!(first.description.as_deref(), Some("logo"));

    assert_eq!(
        images[1].source,
        ImageSource::Unresolved(UnresolvedReason::NotAnImage {
            rel_id: "rId2".into(),
            rel_type: common::REL_HYPERLINK.into(),
        })
    );
    assert_eq!(
        images[2].source,
        ImageSource::Unresolved(UnresolvedReason::UnknownRelationship("rId9".into()))
    );
    assert_eq!(
        images[3].source,
        ImageSource::Unresolved(UnresolvedReason::MissingRelationshipId)
    );
    assert_eq!(
        images[4].source,
        ImageSource::Resolved {
            path: "https://example.com/logo.png".into(),
            external: true
        }
    );

    let run = &first_paragraph(&body).runs[0];
    assert_eq!(run.anchor.as_ref().unwrap().extent_cx, 914_400);
}

#[test]
fn malformed_extent_drops_only_the_drawing() {
    let body = parse_body(
        r#"<w:p><w:r><w:t>kept</w:t><w:drawing><wp:inline><wp:extent cx="wide" cy="10"/>
             <a:graphic><a:graphicData><pic:pic><pic:blipFill><a:blip r:embed="rId1"/></pic:blipFill></pic:pic></a:graphicData></a:graphic>
           </wp:inline></w:drawing></w:r></w:p>
           <w:p><w:r><w:t>next</w:t></w:r></w:p>"#,
    );
    let ps = paragraphs(&body);
    assert_eq!(ps.len(), 2);
    let run = &ps[0].runs[0];
    assert_eq!(run.text, "kept");
    assert!(run.has_drawing);
    assert!(run.image.is_none());
}

#[test]
fn textbox_runs_include_table_cells_and_share_the_anchor() {
    let body = parse_body(
        r#"<w:p><w:r><w:drawing>
             <wp:anchor><wp:extent cx="2540000" cy="1270000"/>
               <wp:positionH relativeFrom="page"><wp:posOffset>254000</wp:posOffset></wp:positionH>
               <a:graphic><a:graphicData><wps:wsp><wps:txbx><w:txbxContent>
                 <w:p><w:r><w:t>top</w:t></w:r></w:p>
                 <w:tbl><w:tr><w:tc><w:p><w:r><w:t>in table</w:t></w:r></w:p></w:tc></w:tr></w:tbl>
                 <w:p><w:r><w:t>bottom</w:t></w:r></w:p>
               </w:txbxContent></wps:txbx></wps:wsp></a:graphicData></a:graphic>
             </wp:anchor>
           </w:drawing></w:r></w:p>"#,
    );
    let run = &first_paragraph(&body).runs[0];
    let anchor = run.anchor.as_ref().unwrap();
    assert_eq!(anchor.width_pt(), 200.0);

    let inner = run.textbox.as_ref().unwrap();
    let texts: Vec<&str> = inner.iter().map(|r| r.get_text()).collect();
    assert_eq!(texts, vec!["top", "in table", "bottom"]);
    assert!(inner.iter().all(|r| r.anchor.as_ref() == Some(anchor)));

    let tb = run.textbox_model().unwrap();
    let tables = tb.content.get_tables();
    let cell_paragraphs = tables[0].rows[0].cells[0].content.get_paragraphs();
    assert_eq!(cell_paragraphs[0].runs[0].anchor.as_ref(), Some(anchor));
    let all_anchored = tb
        .content
        .all_paragraphs()
        .into_iter()
        .flat_map(|p| p.runs.iter())
        .all(|r| r.anchor.as_ref() == Some(anchor));
    assert!(all_anchored);
}
