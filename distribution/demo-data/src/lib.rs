//! Shared sample corpora for tests and benchmarks.

pub struct DemoDocument {
    pub id: &'static str,
    pub locale: Option<&'static str>,
    pub text: &'static str,
}

pub const ENGLISH: DemoDocument = DemoDocument {
    id: "english",
    locale: Some("en"),
    text: "Friendship any contrasted may solicitude mention insipidity in introduced literature it. He seemed denote except as oppose do spring my. Between any may mention evening age shortly can ability regular. He shortly sixteen of colonel colonel evening cordial to. Although jointure an my of mistress servants am weddings. Age why the therefore education unfeeling for arranging. Above again money own scale maids ham least led. Returned settling produced strongly ecstatic use yourself way. Repulsive extremity enjoyment she perceived nor.Prepared is me marianne pleasure likewise debating. Wonder an unable except better stairs do ye admire. His and eat secure sex called esteem praise. So moreover as speedily differed branched ignorant. Tall are her knew poor now does then. Procured to contempt oh he raptures amounted occasion. One boy assure income spirit lovers set.",
};

pub const FRENCH: DemoDocument = DemoDocument {
    id: "french",
    locale: Some("fr"),
    text: "Le client est très important merci, le client sera suivi par le client. Énée n'a pas de justice, pas de résultat, pas de ligula, et la vallée veut la sauce. Mais, beaucoup de temps ne pas maintenant. Morbi mais qui veut vendre une couche de contenu triste d'internet. Être ivre maintenant, mais ne pas maintenant, mon urne est d'une grande beauté, mais elle n'est pas aussi bien faite que dans un livre. Mécène dans la vallée de l'orc, dans l'élément même. Certaines des exigences faciles du budget, qu'il soit beaucoup de temps pour dignissim et. Je ne m'en fais pas chez moi, ça va être moche dans le vestibule. Mais aussi des protéines de Pour avant la fin de la semaine, qui connaît le poison, le résultat.Pour un football doux Je ne pense pas qu'il soit facile de tomber malade avec de la levure ou de la levure. Le bateau et de la terre. Il est basketteur et agent immobilier. Mais quel genre de politique, qui parfois masse. Le cours convient aux commanditaires qui se tournent vers les rivages à travers nos mariages, à travers les projets hyménéens. On dit qu'il habitait cette rue. Il n'y a aucune conséquence sur l'importance de la vie. Parfois, la faim est attendue et avant c'est la première chose dans la gorge. Les enfants lisent le livre, le passeur et pas de flèche, la flèche est le plus gros joueur.",
};

pub const CATALAN: DemoDocument = DemoDocument {
    id: "catalan",
    locale: Some("ca"),
    text: "La col·lecció del museu inclou pintures, escultures i una gran biblioteca.",
};

pub const FOX: DemoDocument = DemoDocument {
    id: "fox",
    locale: None,
    text: "the quick brown fox jumps",
};

pub const DEMO_DOCUMENTS: &[DemoDocument] = &[ENGLISH, FRENCH, CATALAN, FOX];

/// (query, exact, consecutive) triples exercised against the corpora.
pub const DEMO_QUERIES: &[(&str, bool, bool)] = &[
    ("ointur sevrants weddings", false, false),
    ("ointur sevrants weddings", true, false),
    ("any may mention", false, true),
    ("tre impotrant suivi client", false, false),
    ("tre impotrant suivi client", true, false),
    ("mais ne pas maintenant", false, true),
];
