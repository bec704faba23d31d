//! Reading a picked file out of an `<input type="file">`.

/// A file chosen by the user, loaded into memory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PickedFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl PickedFile {
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Metadata of the first file selected in the input behind `ev`, without
/// reading its contents.
pub fn selected_file_meta(ev: &leptos::ev::Event) -> Option<(String, String, u64)> {
    #[cfg(feature = "csr")]
    {
        let file = first_file(ev)?;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let size = file.size().max(0.0) as u64;
        Some((file.name(), file.type_(), size))
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = ev;
        None
    }
}

/// Load the first selected file.
///
/// # Errors
///
/// No file selected or the browser failed to read it.
pub async fn read_selected_file(ev: &leptos::ev::Event) -> Result<PickedFile, String> {
    #[cfg(feature = "csr")]
    {
        let file = first_file(ev).ok_or_else(|| "No file selected".to_owned())?;
        let buffer = wasm_bindgen_futures::JsFuture::from(file.array_buffer()).await.map_err(|e| format!("{e:?}"))?;
        Ok(PickedFile {
            name: file.name(),
            content_type: file.type_(),
            bytes: js_sys::Uint8Array::new(&buffer).to_vec(),
        })
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = ev;
        Err("file access is only available in the browser".to_owned())
    }
}

#[cfg(feature = "csr")]
fn first_file(ev: &leptos::ev::Event) -> Option<web_sys::File> {
    use wasm_bindgen::JsCast;

    let input = ev.target()?.dyn_into::<web_sys::HtmlInputElement>().ok()?;
    input.files()?.get(0)
}
