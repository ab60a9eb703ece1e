mod common;

use common::{first_paragraph, first_table, package, parse_body, parse_package, parse_package_with};
use docxide_model::model::{Body, BookmarkKind, BreakType, Model, Paragraph, VMergeType};
use docxide_model::writer::{body_to_xml, document_xml, escape_xml};
use docxide_model::{MemoryPackage, ParserOptions, TextContainer};

fn reparse(body: &Body) -> Body {
    let pkg = MemoryPackage::new().with_part("word/document.xml", document_xml(body));
    parse_package(&pkg)
}

#[test]
fn escaping() {
    assert_eq!(escape_xml(r#"a < b & "c" 'd'"#), "a &lt; b &amp; &quot;c&quot; &apos;d&apos;");

    let mut body = Body::new();
    body.add_model(Model::Paragraph(Paragraph::with_text("1 < 2 & 3 > 2")));
    let xml = body_to_xml(&body);
    assert_eq!(xml, "<w:p><w:r><w:t>1 &lt; 2 &amp; 3 &gt; 2</w:t></w:r></w:p>");
    assert_eq!(first_paragraph(&reparse(&body)).get_text(), "1 < 2 & 3 > 2");
}

#[test]
fn paragraph_formatting_round_trips() {
    let original = parse_body(
        r#"<w:p>
             <w:pPr><w:pStyle w:val="Quote"/><w:numPr><w:ilvl w:val="1"/><w:numId w:val="3"/></w:numPr><w:jc w:val="right"/></w:pPr>
             <w:bookmarkStart w:id="5" w:name="here"/>
             <w:r>
               <w:rPr><w:b/><w:i w:val="0"/><w:sz w:val="28"/><w:color w:val="FF0000"/><w:u w:val="double"/><w:vertAlign w:val="superscript"/></w:rPr>
               <w:t xml:space="preserve"> lead</w:t><w:tab/><w:t>x</w:t><w:br/><w:t>y</w:t>
             </w:r>
             <w:hyperlink w:anchor="here"><w:r><w:t>link1</w:t></w:r><w:r><w:t>link2</w:t></w:r></w:hyperlink>
             <w:r><w:br w:type="page"/></w:r>
             <w:bookmarkEnd w:id="5"/>
           </w:p>"#,
    );
    let again = reparse(&original);
    let (a, b) = (first_paragraph(&original), first_paragraph(&again));

    assert_eq!(b.get_text(), " lead\tx\nylink1link2");
    assert_eq!(b.get_text(), a.get_text());
    assert_eq!(b.style.style_id.as_deref(), Some("Quote"));
    assert_eq!(b.style.alignment, a.style.alignment);
    assert_eq!(b.numbering, a.numbering);
    assert_eq!(b.bookmarks, a.bookmarks);
    assert_eq!(b.bookmarks[0].kind, BookmarkKind::Start);

    assert_eq!(b.runs.len(), 4);
    assert_eq!(b.runs[0].style, a.runs[0].style);
    assert_eq!(b.runs[0].style.italic, Some(false));
    assert!(b.runs[0].has_tab);
    assert_eq!(b.runs[0].break_type, Some(BreakType::TextWrapping));
    assert_eq!(b.runs[3].break_type, Some(BreakType::Page));

    let links: Vec<_> = b.hyperlinks().collect();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].anchor.as_deref(), Some("here"));
    assert_eq!(links[0].get_text(), "link1link2");
}

#[test]
fn fields_round_trip_without_cached_results() {
    let original = parse_body(
        r#"<w:p>
             <w:r><w:t xml:space="preserve">Page </w:t></w:r>
             <w:r><w:fldChar w:fldCharType="begin"/></w:r>
             <w:r><w:instrText xml:space="preserve"> IF </w:instrText></w:r>
             <w:r><w:fldChar w:fldCharType="begin"/></w:r>
             <w:r><w:instrText xml:space="preserve"> PAGE </w:instrText></w:r>
             <w:r><w:fldChar w:fldCharType="separate"/></w:r>
             <w:r><w:t>1</w:t></w:r>
             <w:r><w:fldChar w:fldCharType="end"/></w:r>
             <w:r><w:instrText xml:space="preserve"> = 1 "one" "many" </w:instrText></w:r>
             <w:r><w:fldChar w:fldCharType="separate"/></w:r>
             <w:r><w:t>one</w:t></w:r>
             <w:r><w:fldChar w:fldCharType="end"/></w:r>
             <w:fldSimple w:instr=" NUMPAGES "><w:r><w:t>9</w:t></w:r></w:fldSimple>
           </w:p>"#,
    );
    let again = reparse(&original);
    let (a, b) = (first_paragraph(&original), first_paragraph(&again));
    assert_eq!(b.get_text(), "Page ");
    assert_eq!(b.runs.len(), a.runs.len());

    let before: Vec<_> = a.fields().map(|f| (f.instruction.clone(), f.kind, f.nested.len())).collect();
    let after: Vec<_> = b.fields().map(|f| (f.instruction.clone(), f.kind, f.nested.len())).collect();
    assert_eq!(after, before);
    assert_eq!(after.len(), 2);
    assert_eq!(after[0].2, 1);
}

#[test]
fn tables_are_written_structurally_without_raw_xml() {
    let options = ParserOptions {
        keep_raw_xml: false,
        ..Default::default()
    };
    let source = r#"<w:tbl>
        <w:tblPr><w:tblStyle w:val="Grid"/></w:tblPr>
        <w:tblGrid><w:gridCol w:w="2000"/><w:gridCol w:w="3000"/></w:tblGrid>
        <w:tr>
          <w:tc><w:tcPr><w:gridSpan w:val="2"/></w:tcPr><w:p><w:r><w:t>wide</w:t></w:r></w:p></w:tc>
        </w:tr>
        <w:tr>
          <w:tc><w:tcPr><w:vMerge w:val="restart"/></w:tcPr><w:p><w:r><w:t>top</w:t></w:r></w:p></w:tc>
          <w:tc><w:p/></w:tc>
        </w:tr>
        <w:tr>
          <w:tc><w:tcPr><w:vMerge/></w:tcPr><w:p/></w:tc>
          <w:tc><w:tbl><w:tr><w:tc><w:p><w:r><w:t>inner</w:t></w:r></w:p></w:tc></w:tr></w:tbl><w:p/></w:tc>
        </w:tr>
      </w:tbl>"#;
    let original = parse_package_with(&package(source), options);
    assert!(first_table(&original).raw_xml.is_none());

    let xml = body_to_xml(&original);
    assert!(xml.contains(r#"<w:tblStyle w:val="Grid"/>"#));
    assert!(xml.contains(r#"<w:gridCol w:w="3000"/>"#));

    let again = parse_package_with(&package(&xml), options);
    let (a, b) = (first_table(&original), first_table(&again));
    assert_eq!(b.grid, a.grid);
    assert_eq!(b.get_text(), a.get_text());
    assert_eq!(b.rows[0].cells[0].grid_span, 2);
    assert_eq!(b.rows[0].cells[0].width, a.rows[0].cells[0].width);
    assert_eq!(b.rows[1].cells[0].vertical_merge_type, Some(VMergeType::Restart));
    assert_eq!(b.rows[2].cells[0].vertical_merge_type, Some(VMergeType::Continue));
    assert_eq!(b.vertical_span(1, 0), 2);
    assert_eq!(b.rows[2].cells[1].get_tables().len(), 1);
}

#[test]
fn objects_are_written_from_raw_xml() {
    let original = parse_body(
        r#"<w:p><w:r><w:pict>
             <v:shape id="_x0000_s1" style="position:absolute;width:2in;height:1in">
               <v:textbox><w:txbxContent><w:p><w:r><w:t>kept box</w:t></w:r></w:p></w:txbxContent></v:textbox>
             </v:shape>
           </w:pict></w:r>
           <w:r><w:sym w:font="Symbol" w:char="F0B7"/></w:r></w:p>
           <w:tbl><w:tr><w:tc><w:p><w:r><w:t>cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl>
           <w:sectPr><w:pgSz w:w="11906" w:h="16838"/></w:sectPr>"#,
    );
    let xml = document_xml(&original);
    assert!(xml.starts_with("<?xml"));
    assert!(xml.contains(r#"xmlns:v="urn:schemas-microsoft-com:vml""#));

    let again = reparse(&original);
    let p = first_paragraph(&again);
    let inner = p.runs[0].textbox.as_ref().unwrap();
    assert_eq!(inner[0].get_text(), "kept box");
    assert_eq!(p.runs[1].symbol.as_ref().unwrap().char_code, "F0B7");
    assert_eq!(first_table(&again).get_text(), "cell");
    assert_eq!(
        again.section_properties.as_ref().unwrap().page_width,
        original.section_properties.as_ref().unwrap().page_width
    );
}

#[test]
fn charts_and_shapes_are_written_from_raw_xml() {
    let original = parse_body(
        r#"<w:p>
             <w:r><w:t>Sales</w:t></w:r>
             <w:r><w:drawing><wp:inline><wp:extent cx="5486400" cy="3200400"/><wp:docPr id="3" name="Chart 1"/>
               <a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/chart">
                 <c:chart xmlns:c="http://schemas.openxmlformats.org/drawingml/2006/chart" r:id="rId9"/>
               </a:graphicData></a:graphic>
             </wp:inline></w:drawing></w:r>
           </w:p>"#,
    );
    let p = first_paragraph(&original);
    assert_eq!(p.runs.len(), 2);
    let chart = &p.runs[1];
    assert!(chart.has_drawing);
    assert!(chart.image.is_none() && chart.textbox.is_none());

    let xml = body_to_xml(&original);
    assert!(xml.contains(r#"<c:chart xmlns:c="http://schemas.openxmlformats.org/drawingml/2006/chart" r:id="rId9"/>"#));

    let again = reparse(&original);
    let b = first_paragraph(&again);
    assert_eq!(b.get_text(), "Sales");
    assert_eq!(b.runs.len(), 2);
    assert!(b.runs[1].has_drawing);
    assert_eq!(b.runs[1].raw_xml, chart.raw_xml);
}
