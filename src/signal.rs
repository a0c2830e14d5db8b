use std::{cell::RefCell, rc::Rc};

pub type SubId = usize;

type Subscriber<T> = Rc<dyn Fn(&T)>;

struct Inner<T> {
    value: T,
    subs: Vec<(SubId, Subscriber<T>)>,
    next_id: SubId,
}

/// Single-threaded observable value. Subscribers run only when the value changes.
pub struct Signal<T: 'static>(Rc<RefCell<Inner<T>>>);

impl<T: 'static> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T> Signal<T>
where
    T: Clone + PartialEq + 'static,
{
    pub fn new(value: T) -> Self {
        Self(Rc::new(RefCell::new(Inner {
            value,
            subs: Vec::new(),
            next_id: 0,
        })))
    }

    pub fn get(&self) -> T {
        self.0.borrow().value.clone()
    }

    /// Store `v`; returns whether it differed from the previous value.
    pub fn set(&self, v: T) -> bool {
        let subs: Vec<Subscriber<T>> = {
            let mut inner = self.0.borrow_mut();
            if inner.value == v {
                return false;
            }
            inner.value = v.clone();
            inner.subs.iter().map(|(_, s)| Rc::clone(s)).collect()
        };
        // Borrow released: subscribers may read the signal.
        for s in subs {
            s(&v);
        }
        true
    }

    /// Read-only handle for consumers.
    pub fn reader(&self) -> ReadSignal<T> {
        ReadSignal(self.clone())
    }
}

impl<T: std::fmt::Debug + 'static> std::fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Signal").field(&self.0.borrow().value).finish()
    }
}

/// Consumer side of a [`Signal`]: can observe, never write.
pub struct ReadSignal<T: 'static>(Signal<T>);

impl<T: 'static> Clone for ReadSignal<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> ReadSignal<T>
where
    T: Clone + PartialEq + 'static,
{
    pub fn get(&self) -> T {
        self.0.get()
    }

    pub fn subscribe(&self, f: impl Fn(&T) + 'static) -> SubId {
        let mut inner = self.0.0.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.subs.push((id, Rc::new(f)));
        id
    }

    pub fn unsubscribe(&self, id: SubId) {
        self.0.0.borrow_mut().subs.retain(|(sid, _)| *sid != id);
    }
}

impl<T: std::fmt::Debug + 'static> std::fmt::Debug for ReadSignal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
