//! A host-side stand-in for the renderer's GPU memory.

use std::collections::HashMap;
use std::sync::Arc;
use parking_lot::{Mutex, RwLock};
use crate::error::{Error as OclError, Result as OclResult};
use crate::gfx::{self, RenderBuffer, TextureType, VertexBuffer};
use crate::standard;


/// Bytes shared between a graphics resource and the compute objects bound
/// to it.
pub type Storage = Arc<RwLock<Vec<u8>>>;

fn new_storage(len: usize) -> Storage {
    Arc::new(RwLock::new(vec![0u8; len]))
}

/// Writes `data` into `storage` in place when the length matches, or returns
/// fresh storage otherwise. Existing bindings keep the old storage in the
/// latter case, as a reallocated GL object invalidates them.
fn replace_contents(storage: Option<&Storage>, data: &[u8]) -> Storage {
    match storage {
        Some(s) if s.read().len() == data.len() => {
            s.write().copy_from_slice(data);
            s.clone()
        },
        _ => Arc::new(RwLock::new(data.to_vec())),
    }
}


struct TextureStore {
    texture_type: TextureType,
    levels: Vec<Storage>,
}

#[derive(Default)]
struct GraphicsStore {
    next_id: u32,
    buffers: HashMap<u32, Storage>,
    textures: HashMap<u32, TextureStore>,
    renderbuffers: HashMap<u32, Storage>,
}

impl GraphicsStore {
    fn alloc_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }
}


/// The object store of a host "renderer".
///
/// Uploading a resource assigns its GL object id, exactly as a real renderer
/// does on first draw. Compute objects bound to the resource afterwards share
/// its bytes. Cloning yields another handle to the same store.
#[derive(Clone, Default)]
pub struct GraphicsMemory {
    store: Arc<Mutex<GraphicsStore>>,
}

impl GraphicsMemory {
    pub fn new() -> GraphicsMemory {
        GraphicsMemory::default()
    }

    /// Uploads (or re-uploads) vertex data. `data` must be exactly
    /// `vb.byte_len()` bytes long.
    pub fn upload_vertex_buffer(&self, vb: &mut VertexBuffer, data: &[u8]) -> OclResult<()> {
        if data.len() != vb.byte_len() {
            return Err(format!("vertex data holds {} bytes, the buffer layout requires {}",
                data.len(), vb.byte_len()).into());
        }

        let mut store = self.store.lock();
        let id = match vb.gl_id() {
            Some(id) if store.buffers.contains_key(&id) => id,
            _ => store.alloc_id(),
        };
        let storage = replace_contents(store.buffers.get(&id), data);
        store.buffers.insert(id, storage);
        vb.set_gl_id(id);
        Ok(())
    }

    /// Uploads an image as a texture of `texture_type`, allocating all of its
    /// mip levels. `base_level` optionally supplies the level 0 pixels;
    /// everything else starts zeroed.
    pub fn upload_image(&self, image: &mut gfx::Image, texture_type: TextureType,
            base_level: Option<&[u8]>) -> OclResult<()> {
        let level_lens = (0..image.mip_count())
            .map(|level| {
                let extent = image.level_extent(texture_type, level);
                standard::extent_len(extent, image.format().pixel_size()).ok_or_else(|| {
                    OclError::InvalidDescriptor(format!("mip level {} of {:?} is too large",
                        level, extent))
                })
            })
            .collect::<OclResult<Vec<usize>>>()?;

        if let Some(data) = base_level {
            if data.len() != level_lens[0] {
                return Err(format!("base level data holds {} bytes, {} required", data.len(),
                    level_lens[0]).into());
            }
        }

        let levels = level_lens.iter().enumerate()
            .map(|(level, &len)| match (level, base_level) {
                (0, Some(data)) => Arc::new(RwLock::new(data.to_vec())),
                _ => new_storage(len),
            })
            .collect();

        let mut store = self.store.lock();
        let id = match image.gl_id() {
            Some(id) if store.textures.contains_key(&id) => id,
            _ => store.alloc_id(),
        };
        store.textures.insert(id, TextureStore { texture_type, levels });
        image.set_gl_id(id);
        Ok(())
    }

    /// Allocates the storage of a render buffer. Texture-backed render
    /// buffers allocate their texture instead.
    pub fn upload_render_buffer(&self, rb: &mut RenderBuffer) -> OclResult<()> {
        if let Some(texture) = rb.texture_mut() {
            let texture_type = texture.texture_type();
            return self.upload_image(texture.image_mut(), texture_type, None);
        }

        let len = standard::extent_len([rb.width(), rb.height(), 1], rb.format().pixel_size())
            .ok_or_else(|| OclError::InvalidDescriptor(format!("render buffer of {}x{} is too \
                large", rb.width(), rb.height())))?;
        let mut store = self.store.lock();
        let id = match rb.gl_id() {
            Some(id) if store.renderbuffers.contains_key(&id) => id,
            _ => store.alloc_id(),
        };
        store.renderbuffers.insert(id, new_storage(len));
        rb.set_gl_id(id);
        Ok(())
    }

    /// Returns the current contents of a vertex buffer, as the rasterizer
    /// would see them.
    pub fn read_vertex_buffer(&self, vb: &VertexBuffer) -> OclResult<Vec<u8>> {
        let id = vb.gl_id().ok_or(OclError::NotUploaded("vertex buffer"))?;
        self.buffer_storage(id).map(|s| s.read().clone())
    }

    /// Returns the current contents of one mip level of an image.
    pub fn read_image_level(&self, image: &gfx::Image, level: u32) -> OclResult<Vec<u8>> {
        let id = image.gl_id().ok_or(OclError::NotUploaded("image"))?;
        image.check_level(level)?;
        let store = self.store.lock();
        let tex = store.textures.get(&id).ok_or(OclError::InvalidGlObject(id))?;
        let level = tex.levels.get(level as usize).ok_or(OclError::InvalidGlObject(id))?;
        let bytes = level.read().clone();
        Ok(bytes)
    }

    /// Returns the current contents of a render buffer.
    pub fn read_render_buffer(&self, rb: &RenderBuffer) -> OclResult<Vec<u8>> {
        if let Some(texture) = rb.texture() {
            return self.read_image_level(texture.image(), 0);
        }
        let id = rb.gl_id().ok_or(OclError::NotUploaded("render buffer"))?;
        self.renderbuffer_storage(id).map(|s| s.read().clone())
    }

    pub(crate) fn buffer_storage(&self, id: u32) -> OclResult<Storage> {
        self.store.lock().buffers.get(&id).cloned().ok_or(OclError::InvalidGlObject(id))
    }

    pub(crate) fn texture_level_storage(&self, id: u32, texture_type: TextureType, level: u32)
            -> OclResult<Storage> {
        let store = self.store.lock();
        let tex = store.textures.get(&id).ok_or(OclError::InvalidGlObject(id))?;
        if tex.texture_type != texture_type {
            return Err(OclError::InvalidDescriptor(format!("GL texture {} was uploaded as {:?}, \
                not {:?}", id, tex.texture_type, texture_type)));
        }
        tex.levels.get(level as usize).cloned().ok_or(OclError::InvalidGlObject(id))
    }

    pub(crate) fn renderbuffer_storage(&self, id: u32) -> OclResult<Storage> {
        self.store.lock().renderbuffers.get(&id).cloned().ok_or(OclError::InvalidGlObject(id))
    }
}

impl std::fmt::Debug for GraphicsMemory {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let store = self.store.lock();
        f.debug_struct("GraphicsMemory")
            .field("buffers", &store.buffers.len())
            .field("textures", &store.textures.len())
            .field("renderbuffers", &store.renderbuffers.len())
            .finish()
    }
}
