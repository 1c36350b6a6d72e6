/// Binary min-heap over a `Vec`, smallest element at index 0.
#[derive(Debug, Clone)]
pub struct MinHeap<T> {
    elements: Vec<T>,
}

impl<T> MinHeap<T> {
    pub fn heap_size(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    fn parent(i: usize) -> usize {
        (i - 1) / 2
    }

    fn left(i: usize) -> usize {
        2 * i + 1
    }

    fn right(i: usize) -> usize {
        2 * i + 2
    }
}

impl<T: Ord> MinHeap<T> {
    pub fn build(source: Vec<T>) -> Self {
        let mut heap = MinHeap { elements: source };
        let n = heap.heap_size();
        for i in (0..n / 2).rev() {
            heap.min_heapify(i);
        }
        heap
    }

    pub fn valid_min_heap(&self) -> bool {
        (1..self.heap_size()).all(|i| self.elements[Self::parent(i)] <= self.elements[i])
    }

    fn min_heapify(&mut self, mut i: usize) {
        loop {
            let l = Self::left(i);
            let r = Self::right(i);
            let mut smallest = i;

            if l < self.heap_size() && self.elements[l] < self.elements[smallest] {
                smallest = l;
            }
            if r < self.heap_size() && self.elements[r] < self.elements[smallest] {
                smallest = r;
            }
            if smallest == i {
                return;
            }
            self.elements.swap(i, smallest);
            i = smallest;
        }
    }

    pub fn insert(&mut self, value: T) {
        self.elements.push(value);
        let mut i = self.heap_size() - 1;
        while i > 0 && self.elements[i] < self.elements[Self::parent(i)] {
            let p = Self::parent(i);
            self.elements.swap(i, p);
            i = p;
        }
        debug_assert!(self.valid_min_heap());
    }

    pub fn extract_min(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let n = self.heap_size() - 1;
        self.elements.swap(0, n);
        let result = self.elements.pop();
        self.min_heapify(0);
        result
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn extracts_in_ascending_order() {
        let mut heap = MinHeap::build(vec![5, 3, 9, 1, 7, 1, 4]);
        assert!(heap.valid_min_heap());
        heap.insert(0);
        heap.insert(6);

        let mut out = Vec::new();
        while let Some(v) = heap.extract_min() {
            assert!(heap.valid_min_heap());
            out.push(v);
        }
        assert_eq!(out, vec![0, 1, 1, 3, 4, 5, 6, 7, 9]);
    }

    #[test]
    fn empty_heap_underflows() {
        let mut heap: MinHeap<u8> = MinHeap::build(Vec::new());
        assert_eq!(heap.extract_min(), None);
        heap.insert(2);
        assert_eq!(heap.extract_min(), Some(2));
        assert!(heap.is_empty());
    }
}
