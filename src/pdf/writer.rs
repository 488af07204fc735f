// 画像XObject構築、ページツリー組立、アトミック書き出し

use std::io::Write;
use std::path::Path;

use flate2::Compression;
use flate2::write::ZlibEncoder;
use image::RgbImage;
use lopdf::{Document, Object, Stream, dictionary};
use tracing::{debug, info};

/// 反転済みページビットマップから複数ページの出力PDFを組み立てる。
///
/// One input bitmap becomes one output page, in insertion order. Page
/// pixels are embedded losslessly (FlateDecode raw RGB), so decoding an
/// output page reproduces the inverted bitmap exactly.
pub struct DarkPageWriter {
    doc: Document,
    pages_id: lopdf::ObjectId,
    page_ids: Vec<lopdf::ObjectId>,
}

impl DarkPageWriter {
    pub fn new() -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            page_ids: Vec::new(),
        }
    }

    /// ページ画像XObjectを追加する。
    ///
    /// 戻り値はXObjectのオブジェクトID。
    fn add_page_image_xobject(
        &mut self,
        bitmap: &RgbImage,
    ) -> crate::error::Result<lopdf::ObjectId> {
        let (width, height) = bitmap.dimensions();

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(bitmap.as_raw())?;
        let data = encoder.finish()?;

        let dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width as i64,
            "Height" => height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => "FlateDecode",
        };
        let stream = Stream::new(dict, data);
        Ok(self.doc.add_object(Object::Stream(stream)))
    }

    /// ページ描画用のコンテンツストリームバイト列を生成する。
    ///
    /// `q <w_pts> 0 0 <h_pts> 0 0 cm /<name> Do Q`
    fn build_page_content_stream(image_name: &str, width_pts: f64, height_pts: f64) -> Vec<u8> {
        format!("q {width_pts} 0 0 {height_pts} 0 0 cm /{image_name} Do Q").into_bytes()
    }

    /// Appends one page drawing the bitmap across the full MediaBox.
    ///
    /// The MediaBox is `pixels * 72 / dpi` points on each axis, so the
    /// physical page size matches the source page rendered at `dpi`.
    pub fn add_page(&mut self, bitmap: &RgbImage, dpi: u32) -> crate::error::Result<()> {
        let (width_px, height_px) = bitmap.dimensions();
        let width_pts = width_px as f64 * 72.0 / dpi as f64;
        let height_pts = height_px as f64 * 72.0 / dpi as f64;

        let image_id = self.add_page_image_xobject(bitmap)?;
        let image_name = format!("Im{}", self.page_ids.len());

        let mut xobject_dict = lopdf::Dictionary::new();
        xobject_dict.set(image_name.as_bytes(), Object::Reference(image_id));

        let resources_id = self.doc.add_object(dictionary! {
            "XObject" => Object::Dictionary(xobject_dict),
        });

        let content_bytes = Self::build_page_content_stream(&image_name, width_pts, height_pts);
        let content_stream = Stream::new(dictionary! {}, content_bytes);
        let content_id = self.doc.add_object(Object::Stream(content_stream));

        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(width_pts as f32),
                Object::Real(height_pts as f32),
            ],
            "Resources" => resources_id,
            "Contents" => content_id,
        });
        self.page_ids.push(page_id);

        debug!(
            page = self.page_ids.len(),
            width_px, height_px, "page assembled"
        );
        Ok(())
    }

    /// 追加済みページ数を返す。
    pub fn page_len(&self) -> usize {
        self.page_ids.len()
    }

    /// PDFドキュメントをバイト列として出力する。
    ///
    /// ページが1枚も無い場合は `EmptyInputError`。
    pub fn save_to_bytes(&self) -> crate::error::Result<Vec<u8>> {
        if self.page_ids.is_empty() {
            return Err(crate::error::PdfDarkError::empty_input(
                "no pages to assemble",
            ));
        }

        // clone to avoid borrowing issues with save_to (takes &mut self in lopdf)
        let mut doc = self.doc.clone();

        let kids: Vec<Object> = self.page_ids.iter().map(|&id| id.into()).collect();
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => Object::Integer(self.page_ids.len() as i64),
        };
        doc.objects.insert(self.pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf)?;
        Ok(buf)
    }

    /// 出力先ディレクトリ内の一時ファイルへ書き込み、成功時にリネームで確定する。
    ///
    /// On failure the temp file is dropped and deleted, so no partial
    /// output is ever left at the destination path.
    pub fn write_to_file(&self, output_path: &Path) -> crate::error::Result<()> {
        let bytes = self.save_to_bytes()?;

        let dir = match output_path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| {
            crate::error::PdfDarkError::write(format!(
                "cannot create temp file in {}: {e}",
                dir.display()
            ))
        })?;
        tmp.write_all(&bytes)
            .map_err(|e| crate::error::PdfDarkError::write(e.to_string()))?;
        tmp.persist(output_path)
            .map_err(|e| crate::error::PdfDarkError::write(e.to_string()))?;

        info!(
            path = %output_path.display(),
            pages = self.page_ids.len(),
            "output written"
        );
        Ok(())
    }
}
