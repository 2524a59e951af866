use std::collections::HashMap;
use std::fmt;

use kopi_types::{ClassId, FieldId};

use crate::value::Value;

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u32);

impl ObjectId {
    #[must_use]
    pub fn idx(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.0)
    }
}

/// A reference to a heap object, tagged with the object's runtime class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    pub id: ObjectId,
    pub class: ClassId,
}

#[derive(Clone, Debug)]
struct HeapObject {
    /// One slot per field of the instance layout, shadowed fields included.
    fields: HashMap<FieldId, Value>,
    /// Contents of a `java.lang.String`.
    text: Option<String>,
}

/// Objects allocated by one interpreter. Nothing is ever collected.
#[derive(Clone, Debug, Default)]
pub struct Heap {
    objects: Vec<HeapObject>,
}

impl Heap {
    pub(crate) fn alloc(
        &mut self,
        class: ClassId,
        fields: impl IntoIterator<Item = (FieldId, Value)>,
    ) -> ObjectRef {
        self.push(
            class,
            HeapObject {
                fields: fields.into_iter().collect(),
                text: None,
            },
        )
    }

    pub(crate) fn alloc_string(&mut self, class: ClassId, text: String) -> ObjectRef {
        self.push(
            class,
            HeapObject {
                fields: HashMap::new(),
                text: Some(text),
            },
        )
    }

    fn push(&mut self, class: ClassId, object: HeapObject) -> ObjectRef {
        let id = ObjectId(self.objects.len() as u32);
        self.objects.push(object);
        ObjectRef { id, class }
    }

    /// `None` when `field` is not part of the object's layout.
    #[must_use]
    pub fn get(&self, object: ObjectRef, field: FieldId) -> Option<Value> {
        self.objects.get(object.id.idx())?.fields.get(&field).copied()
    }

    pub(crate) fn set(&mut self, object: ObjectRef, field: FieldId, value: Value) {
        if let Some(object) = self.objects.get_mut(object.id.idx()) {
            object.fields.insert(field, value);
        }
    }

    #[must_use]
    pub fn text(&self, object: ObjectRef) -> Option<&str> {
        self.objects.get(object.id.idx())?.text.as_deref()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
