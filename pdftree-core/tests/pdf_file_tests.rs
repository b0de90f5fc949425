//! Tree operations against real PDF files written to a temporary directory

use lopdf::{dictionary, Document, Object, ObjectId as LoId, Stream, StringFormat};
use pdftree::{
    fetch_tree_file, resolve_object_file, InspectOptions, ObjectGraph, ObjectId, PdfFile,
    ResolutionMode, ResolveDepth, SerializedNode, StringEncoding, TreeError, TreeRequest,
};
use pretty_assertions::assert_eq;
use std::path::PathBuf;
use tempfile::TempDir;

struct Fixture {
    _dir: TempDir,
    path: PathBuf,
    catalog: LoId,
    pages: LoId,
    page: LoId,
    content: LoId,
    image: LoId,
}

/// One page, one content stream, an info dictionary with text and binary strings.
fn write_sample_pdf() -> Fixture {
    let mut doc = Document::with_version("1.5");
    let pages_id: LoId = doc.new_object_id();

    let content_id = doc.add_object(Stream::new(
        dictionary! { "Filter" => "ASCIIHexDecode" },
        b"42540A4554>".to_vec(),
    ));

    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Filter" => "DCTDecode",
        },
        vec![0xFF, 0xD8, 0xFF, 0xE0, 0xFF, 0xD9],
    ));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        "Contents" => content_id,
        "UserUnit" => Object::Real(1.5),
        "Scale" => Object::Real(595.28),
        "Thumb" => image_id,
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::from(page_id)],
            "Count" => 1i64,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
        "Lang" => Object::string_literal("en-US"),
        "ID" => Object::String(vec![0x00, 0xff, 0x10], StringFormat::Hexadecimal),
        "NeedsRendering" => false,
        "Title" => Object::String(b"Caf\xe9".to_vec(), StringFormat::Literal),
    });
    doc.trailer.set("Root", catalog_id);

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sample.pdf");
    doc.save(&path).unwrap();

    Fixture {
        _dir: dir,
        path,
        catalog: catalog_id,
        pages: pages_id,
        page: page_id,
        content: content_id,
        image: image_id,
    }
}

fn id(raw: LoId) -> ObjectId {
    ObjectId::new(raw.0, raw.1)
}

fn key<'a>(node: &'a SerializedNode, name: &str) -> &'a SerializedNode {
    node.as_dict()
        .and_then(|dict| dict.get(name))
        .unwrap_or_else(|| panic!("missing key {name} in {node:?}"))
}

#[test]
fn test_open_and_fetch_catalog() {
    let fixture = write_sample_pdf();
    let file = PdfFile::open(&fixture.path).unwrap();
    assert_eq!(file.version(), "1.5");

    let catalog = file.catalog().unwrap();
    assert_eq!(catalog.as_dict().and_then(|d| d.get_type()), Some("Catalog"));
    assert_eq!(
        file.object(id(fixture.catalog)).unwrap().into_owned(),
        catalog.into_owned()
    );
}

#[test]
fn test_lazy_tree_of_file() {
    let fixture = write_sample_pdf();
    let response = fetch_tree_file(
        &fixture.path,
        &TreeRequest::default(),
        &InspectOptions::default(),
    )
    .unwrap();

    let root = &response.result;
    assert_eq!(key(root, "/Type"), &SerializedNode::name("/Catalog"));
    assert_eq!(key(root, "/Pages"), &SerializedNode::reference(id(fixture.pages)));
    assert_eq!(
        key(root, "/NeedsRendering"),
        &SerializedNode::Boolean { value: false }
    );
    assert_eq!(
        key(root, "/Lang"),
        &SerializedNode::String {
            value: "en-US".to_string(),
            encoding: StringEncoding::Text,
        }
    );
    assert_eq!(
        key(root, "/ID"),
        &SerializedNode::String {
            value: "<00ff10>".to_string(),
            encoding: StringEncoding::Bytes,
        }
    );
    assert!(response.indirect_objects.is_none());
}

#[test]
fn test_full_tree_of_file() {
    let fixture = write_sample_pdf();
    let response = fetch_tree_file(
        &fixture.path,
        &TreeRequest::new(ResolutionMode::Full),
        &InspectOptions::default(),
    )
    .unwrap();

    let store = response.indirect_objects.unwrap();
    assert!(store.contains(&id(fixture.pages)));
    assert!(store.contains(&id(fixture.page)));
    assert!(store.contains(&id(fixture.content)));
    assert!(!store.contains(&id(fixture.catalog)));

    let content = store.get(&id(fixture.content)).unwrap();
    match content {
        SerializedNode::Stream {
            dictionary,
            has_data,
            data_length,
        } => {
            assert!(*has_data);
            assert_eq!(*data_length, Some(5));
            assert_eq!(key(dictionary, "/Filter"), &SerializedNode::name("/ASCIIHexDecode"));
        }
        other => panic!("Expected stream, got {other:?}"),
    }

    let page = store.get(&id(fixture.page)).unwrap();
    assert_eq!(key(page, "/Parent"), &SerializedNode::reference(id(fixture.pages)));
    assert_eq!(key(page, "/UserUnit"), &SerializedNode::real(1.5));
}

#[test]
fn test_path_through_file() {
    let fixture = write_sample_pdf();
    let request = TreeRequest::new(ResolutionMode::Lazy).with_path("Pages.Kids.0.MediaBox.3");
    let response = fetch_tree_file(&fixture.path, &request, &InspectOptions::default()).unwrap();
    assert_eq!(response.result, SerializedNode::integer(792));

    let request = TreeRequest::new(ResolutionMode::Full).with_path("Pages.Count");
    let response = fetch_tree_file(&fixture.path, &request, &InspectOptions::default()).unwrap();
    assert_eq!(response.result, SerializedNode::integer(1));
}

#[test]
fn test_tree_from_object_id_in_file() {
    let fixture = write_sample_pdf();
    let (number, generation) = fixture.page;
    let request = TreeRequest::new(ResolutionMode::Lazy)
        .with_object_id(format!("{number} {generation}"))
        .with_path("Type");
    let response = fetch_tree_file(&fixture.path, &request, &InspectOptions::default()).unwrap();
    assert_eq!(response.result, SerializedNode::name("/Page"));
}

#[test]
fn test_resolve_object_in_file() {
    let fixture = write_sample_pdf();
    let canonical = id(fixture.pages).to_string();

    let shallow = resolve_object_file(
        &fixture.path,
        &canonical,
        ResolveDepth::Shallow,
        &InspectOptions::default(),
    )
    .unwrap();
    assert_eq!(shallow.object_id, canonical);
    assert_eq!(key(&shallow.content, "/Count"), &SerializedNode::integer(1));
    assert!(shallow.indirect_objects.is_none());

    let deep = resolve_object_file(
        &fixture.path,
        &canonical,
        ResolveDepth::Deep,
        &InspectOptions::default(),
    )
    .unwrap();
    let store = deep.indirect_objects.unwrap();
    assert!(store.contains(&id(fixture.page)));
    assert!(store.contains(&id(fixture.content)));
    // the page points back at the pages node, which is the starting object
    assert!(store.contains(&id(fixture.pages)));
}

#[test]
fn test_resolve_missing_object_in_file() {
    let fixture = write_sample_pdf();
    let err = resolve_object_file(
        &fixture.path,
        "999-0",
        ResolveDepth::Shallow,
        &InspectOptions::default(),
    )
    .unwrap_err();

    assert_eq!(err.kind(), "object_not_found");
    assert_eq!(err.to_string(), "Object 999-0 not found in PDF");
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.pdf");

    let err = PdfFile::open(&path).unwrap_err();
    assert!(matches!(err, TreeError::DocumentAccess { details: None, .. }));
    assert_eq!(
        err.to_string(),
        format!("PDF file not found: {}", path.display())
    );
}

#[test]
fn test_garbage_file_is_parsing_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("garbage.pdf");
    std::fs::write(&path, b"this is not a pdf at all").unwrap();

    let err = fetch_tree_file(&path, &TreeRequest::default(), &InspectOptions::default())
        .unwrap_err();
    assert_eq!(err.kind(), "parsing");
    assert!(err.to_string().starts_with("Error parsing PDF: "));
    assert!(err.details().is_some());
}

#[test]
fn test_reals_keep_their_written_value() {
    let fixture = write_sample_pdf();
    let request = TreeRequest::new(ResolutionMode::Lazy).with_path("Pages.Kids.0.Scale");
    let response = fetch_tree_file(&fixture.path, &request, &InspectOptions::default()).unwrap();

    assert_eq!(response.result, SerializedNode::real(595.28));
    assert_eq!(
        serde_json::to_string(&response.result).unwrap(),
        r#"{"type":"number","value":595.28}"#
    );
}

#[test]
fn test_pdf_doc_encoded_string_is_text() {
    let fixture = write_sample_pdf();
    let response = fetch_tree_file(
        &fixture.path,
        &TreeRequest::default(),
        &InspectOptions::default(),
    )
    .unwrap();

    assert_eq!(
        key(&response.result, "/Title"),
        &SerializedNode::String {
            value: "Café".to_string(),
            encoding: StringEncoding::Text,
        }
    );
}

#[test]
fn test_jpeg_stream_reports_length() {
    let fixture = write_sample_pdf();
    let canonical = id(fixture.image).to_string();
    let response = resolve_object_file(
        &fixture.path,
        &canonical,
        ResolveDepth::Shallow,
        &InspectOptions::default(),
    )
    .unwrap();

    match response.content {
        SerializedNode::Stream { data_length, .. } => assert_eq!(data_length, Some(6)),
        other => panic!("Expected stream, got {other:?}"),
    }
}
