//! Exercises the public surface of `Deque` and prints what it sees.

use blockdeque::Deque;

fn main() {
    let mut a: Deque<String> = Deque::new();
    let mut b = a.take();
    let c = b.clone();
    b.clone_from(&c);
    println!("moved from: len {} capacity {}", a.len(), a.capacity());
    println!("copy of empty: len {} capacity {}", c.len(), c.capacity());

    let mut d = Deque::new();
    for s in &["1", "2", "3", "4", "5"] {
        d.push_back(s.to_string());
    }
    d.push_front(String::from("0"));
    d.push_front(String::from("-1"));
    println!("{}", d);

    for s in &d {
        print!("{} ", s);
    }
    println!();

    let mut it = d.begin();
    print!("{}", it.get().unwrap());
    it.move_next();
    print!("{}", it.get().unwrap());
    it.move_next();
    print!("{}", it.get().unwrap());
    it.move_prev();
    print!("{}", it.get().unwrap());
    it.move_prev();
    println!("{}", it.get().unwrap());

    let end = d.end();
    let same = it;
    println!(
        "< {} <= {} > {} >= {} == {} self == {}",
        it < end,
        it <= end,
        it > end,
        it >= end,
        it == end,
        it == same
    );
    println!("first char of front: {:?}", it.get().and_then(|s| s.chars().next()));

    b.move_from(&mut d);
    b[0] = String::from("ab");
    let shown: Vec<&str> = (0..7).map(|i| b[i].as_str()).collect();
    println!("{}", shown.concat());

    match b.at(7) {
        Ok(s) => println!("unexpected element {}", s),
        Err(err) => println!("{}", err),
    }

    b = b.take();
    println!("back: {}", b.back().unwrap());

    let s = String::from("rgssgvxcds");
    b.push_back(s.clone());
    b.push_back(s);
    println!("back: {}", b.back().unwrap());

    for _ in 0..9 {
        b.emplace_front(|| String::from("first"));
    }
    println!("{}", b);
    println!("last via cursor: {}", (b.end() - 1).get().unwrap());

    b.clear();
    b.push_front(String::from("ss"));
    println!("front after clear: {}", b.front().unwrap());

    let mut g = Deque::new();
    g.push_back("aaa");
    g.push_back("bbb");
    g.pop_back();
    println!("[{}]", g);
    g.pop_back();
    println!("[{}]", g);
    for s in &["aaa", "bbb", "ccc", "ddd", "eee"] {
        g.push_back(*s);
    }
    for _ in 0..4 {
        g.pop_front();
    }
    println!("[{}]", g);
    g.pop_back();
    println!("[{}]", g);

    let r = Deque::from_elem("test", 5);
    println!("{}", r);
    println!("{}", r.len());
    let (itb, ite) = (r.begin(), r.end());
    println!("{} {}", ite - itb, (ite - 4).get().unwrap());
}
