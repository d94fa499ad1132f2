//! PDF Document wrapper

use crate::form::{decode_text_string, encode_text_string, value_to_string};
use crate::{FieldKind, FieldValue, FormField, PdfError, Result};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId};
use std::path::Path;

/// Guards against `/Parent` cycles in malformed forms
const MAX_FIELD_DEPTH: usize = 32;

/// Appearance state name for an unchecked checkbox
const OFF_STATE: &[u8] = b"Off";

/// Appearance state name used when a checkbox declares none of its own
const DEFAULT_ON_STATE: &[u8] = b"Yes";

/// PDF Document wrapper providing form-level operations
pub struct PdfDocument {
    /// The underlying lopdf document
    inner: Document,
    /// Set once a written value has no matching appearance stream
    appearances_dirty: bool,
}

impl PdfDocument {
    /// Open a PDF document from a file path
    ///
    /// # Arguments
    /// * `path` - Path to the PDF file
    ///
    /// # Example
    /// ```ignore
    /// let doc = PdfDocument::open("template.pdf")?;
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let inner = Document::load(path)
            .map_err(|e| PdfError::OpenError(format!("{}: {}", path.display(), e)))?;

        Ok(Self {
            inner,
            appearances_dirty: false,
        })
    }

    /// Open a PDF document from bytes
    ///
    /// # Arguments
    /// * `data` - PDF file bytes
    pub fn open_from_bytes(data: &[u8]) -> Result<Self> {
        let inner = Document::load_mem(data)
            .map_err(|e| PdfError::OpenError(e.to_string()))?;

        Ok(Self {
            inner,
            appearances_dirty: false,
        })
    }

    /// Get the number of pages in the document
    pub fn page_count(&self) -> usize {
        self.inner.get_pages().len()
    }

    /// List every form widget, page by page in annotation order
    ///
    /// Widgets without a name anywhere up their `/Parent` chain are left out.
    pub fn form_fields(&self) -> Result<Vec<FormField>> {
        let mut fields = Vec::new();
        for page in 1..=self.page_count() {
            fields.extend(self.page_fields(page)?);
        }
        Ok(fields)
    }

    /// List the form widgets of one page
    ///
    /// # Arguments
    /// * `page` - Page number (1-indexed)
    pub fn page_fields(&self, page: usize) -> Result<Vec<FormField>> {
        let pages = self.inner.get_pages();
        let page_id = *pages
            .get(&(page as u32))
            .ok_or(PdfError::InvalidPage(page, pages.len()))?;

        let mut fields = Vec::new();
        for widget_id in self.page_widget_ids(page_id)? {
            if let Some(field) = self.read_field(page, widget_id)? {
                fields.push(field);
            }
        }

        Ok(fields)
    }

    /// Look up the first widget of a field by its fully qualified name
    pub fn field(&self, name: &str) -> Result<FormField> {
        self.form_fields()?
            .into_iter()
            .find(|field| field.name == name)
            .ok_or_else(|| PdfError::FieldNotFound(name.to_string()))
    }

    /// Store a value in a field and mark its appearance for regeneration
    ///
    /// Text and choice values drop the widget's stale `/AP` and raise
    /// `NeedAppearances` on save; choices also clear the `/I` selection
    /// indices. Checkboxes switch `/V` and `/AS` between the widget's own
    /// "on" state and `Off`, raising `NeedAppearances` when the widget has no
    /// appearance for the chosen state.
    pub fn set_field_value(&mut self, field: &FormField, value: &FieldValue) -> Result<()> {
        match value {
            FieldValue::Text(text) => {
                self.dictionary_mut(field.field_id)?
                    .set("V", encode_text_string(text));
                self.drop_appearance(field.widget_id)?;
            }
            FieldValue::Choice(choice) => {
                let dict = self.dictionary_mut(field.field_id)?;
                dict.set("V", encode_text_string(choice));
                dict.remove(b"I");
                self.drop_appearance(field.widget_id)?;
            }
            FieldValue::Checked(checked) => {
                let states = self.normal_appearance_states(field.widget_id)?;
                let state = if *checked {
                    states
                        .iter()
                        .find(|key| key.as_slice() != OFF_STATE)
                        .cloned()
                        .unwrap_or_else(|| DEFAULT_ON_STATE.to_vec())
                } else {
                    OFF_STATE.to_vec()
                };
                if !states.contains(&state) {
                    self.appearances_dirty = true;
                }

                self.dictionary_mut(field.field_id)?
                    .set("V", Object::Name(state.clone()));
                self.dictionary_mut(field.widget_id)?
                    .set("AS", Object::Name(state));
            }
        }

        Ok(())
    }

    /// Save the document to a file
    ///
    /// # Arguments
    /// * `path` - Output file path
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.finalize_appearances()?;

        self.inner
            .save(path)
            .map_err(|e| PdfError::SaveError(e.to_string()))?;
        Ok(())
    }

    /// Save the document to bytes
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        self.finalize_appearances()?;

        let mut buffer = Vec::new();
        self.inner
            .save_to(&mut buffer)
            .map_err(|e| PdfError::SaveError(e.to_string()))?;

        Ok(buffer)
    }

    /// Get a reference to the underlying lopdf document
    pub fn inner(&self) -> &Document {
        &self.inner
    }

    /// Follow one level of indirection
    fn resolve<'a>(&'a self, obj: &'a Object) -> Result<&'a Object> {
        match obj {
            Object::Reference(id) => Ok(self.inner.get_object(*id)?),
            other => Ok(other),
        }
    }

    fn dictionary_mut(&mut self, id: ObjectId) -> Result<&mut Dictionary> {
        Ok(self.inner.get_object_mut(id)?.as_dict_mut()?)
    }

    /// Widget annotations referenced from a page's `/Annots`
    fn page_widget_ids(&self, page_id: ObjectId) -> Result<Vec<ObjectId>> {
        let page = self.inner.get_dictionary(page_id)?;
        let annots = match page.get(b"Annots") {
            Ok(obj) => self.resolve(obj)?,
            Err(_) => return Ok(Vec::new()),
        };
        let Ok(annots) = annots.as_array() else {
            return Ok(Vec::new());
        };

        let mut ids = Vec::new();
        for annot in annots {
            // Inline annotation dictionaries cannot be addressed for writing
            let Ok(id) = annot.as_reference() else {
                continue;
            };
            let Ok(dict) = self.inner.get_dictionary(id) else {
                continue;
            };
            let is_widget = dict
                .get(b"Subtype")
                .and_then(Object::as_name)
                .map(|name| name == b"Widget")
                .unwrap_or(false);
            if is_widget {
                ids.push(id);
            }
        }

        Ok(ids)
    }

    /// The widget followed by its ancestors through `/Parent`
    fn field_chain(&self, widget_id: ObjectId) -> Result<Vec<(ObjectId, &Dictionary)>> {
        let mut chain: Vec<(ObjectId, &Dictionary)> = Vec::new();
        let mut current = Some(widget_id);

        while let Some(id) = current {
            if chain.len() >= MAX_FIELD_DEPTH || chain.iter().any(|(seen, _)| *seen == id) {
                break;
            }
            let dict = self.inner.get_dictionary(id)?;
            current = dict
                .get(b"Parent")
                .and_then(Object::as_reference)
                .ok();
            chain.push((id, dict));
        }

        Ok(chain)
    }

    /// Build the [`FormField`] for one widget, resolving inherited attributes
    fn read_field(&self, page: usize, widget_id: ObjectId) -> Result<Option<FormField>> {
        let chain = self.field_chain(widget_id)?;

        let Some(field_id) = chain
            .iter()
            .find(|(_, dict)| dict.has(b"T"))
            .map(|(id, _)| *id)
        else {
            return Ok(None);
        };

        let mut partial_names = Vec::new();
        for (_, dict) in chain.iter().rev() {
            if let Ok(title) = dict.get(b"T") {
                if let Ok(bytes) = self.resolve(title)?.as_str() {
                    partial_names.push(decode_text_string(bytes));
                }
            }
        }
        let name = partial_names.join(".");
        if name.is_empty() {
            return Ok(None);
        }

        let field_type = chain
            .iter()
            .find_map(|(_, dict)| dict.get(b"FT").and_then(Object::as_name).ok());
        let field_flags = chain
            .iter()
            .find_map(|(_, dict)| dict.get(b"Ff").and_then(Object::as_i64).ok())
            .unwrap_or(0);

        let mut value = None;
        for (_, dict) in &chain {
            if let Ok(v) = dict.get(b"V") {
                value = value_to_string(self.resolve(v)?);
                break;
            }
        }

        Ok(Some(FormField {
            name,
            kind: FieldKind::classify(field_type, field_flags),
            value,
            page,
            field_id,
            widget_id,
        }))
    }

    fn drop_appearance(&mut self, widget_id: ObjectId) -> Result<()> {
        self.dictionary_mut(widget_id)?.remove(b"AP");
        self.appearances_dirty = true;
        Ok(())
    }

    /// State names under the widget's `/AP /N`, empty when it has none
    fn normal_appearance_states(&self, widget_id: ObjectId) -> Result<Vec<Vec<u8>>> {
        let widget = self.inner.get_dictionary(widget_id)?;

        let Ok(ap) = widget.get(b"AP") else {
            return Ok(Vec::new());
        };
        let Ok(ap) = self.resolve(ap)?.as_dict() else {
            return Ok(Vec::new());
        };
        let Ok(normal) = ap.get(b"N") else {
            return Ok(Vec::new());
        };

        Ok(match self.resolve(normal)?.as_dict() {
            Ok(states) => states.iter().map(|(key, _)| key.clone()).collect(),
            Err(_) => Vec::new(),
        })
    }

    /// Raise `NeedAppearances` on the AcroForm if any appearance was dropped
    fn finalize_appearances(&mut self) -> Result<()> {
        if !self.appearances_dirty {
            return Ok(());
        }

        let catalog_id = self
            .inner
            .trailer
            .get(b"Root")
            .and_then(Object::as_reference)
            .map_err(|_| PdfError::ParseError("trailer has no document catalog".to_string()))?;
        let acroform = self
            .inner
            .get_dictionary(catalog_id)?
            .get(b"AcroForm")
            .ok()
            .cloned();

        match acroform {
            Some(Object::Reference(id)) => {
                self.dictionary_mut(id)?.set("NeedAppearances", true);
            }
            Some(Object::Dictionary(mut acroform)) => {
                acroform.set("NeedAppearances", true);
                self.dictionary_mut(catalog_id)?.set("AcroForm", acroform);
            }
            _ => {
                log::warn!("document has widgets but no AcroForm; adding one");
                self.dictionary_mut(catalog_id)?.set(
                    "AcroForm",
                    dictionary! {
                        "Fields" => Vec::<Object>::new(),
                        "NeedAppearances" => true,
                    },
                );
            }
        }

        self.appearances_dirty = false;
        Ok(())
    }
}
